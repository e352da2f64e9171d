//! One-shot handshake with the zChain node, single-flight per process.
//!
//! # Protocol
//!
//! 1. Send `startZChainServer` on the UI → node channel.
//! 2. Wait (bounded) for `ZChainServerStarted` on the node → UI channel.
//! 3. Resolve a [`Session`] and publish Connected, or fail and publish
//!    Disconnected.
//!
//! The pending handshake is a shared future: bootstrap calls made while one
//! is in flight await the same result and never send a second start signal.
//! Failure clears the slot so the UI can retry; success is cached for the
//! life of the process until [`SessionBootstrap::teardown`].
//!
//! This struct also owns the single reverse-channel dispatcher. Readiness
//! and channel-closed events are consumed internally; every other envelope
//! is forwarded to the application handler registered with
//! [`SessionBootstrap::on_event`].

use crate::config::SessionConfig;
use crate::error::session::SessionError;
use crate::session::handle::Session;
use crate::state::{ConnectionEvent, ConnectionTracker};
use crate::sync::lock_unpoisoned;
use crate::transport::{Envelope, MessageHandler, Transport};
use crate::{EVENT_SERVER_CLOSED, EVENT_SERVER_STARTED, METHOD_START_SERVER};

use common::ErrorLocation;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use log::{debug, info, warn};
use tokio::sync::oneshot;
use tokio::time;

/// Readiness waiter. Armed before the start signal goes out; taken (and
/// thereby disarmed) by the first readiness event, so it fires at most once.
/// Carries the optional account the node reports when it comes up.
type ReadySlot = Arc<Mutex<Option<oneshot::Sender<Option<String>>>>>;

type EventSlot = Arc<Mutex<Option<MessageHandler>>>;

type InFlight = Shared<BoxFuture<'static, Result<Session, SessionError>>>;

pub struct SessionBootstrap {
    transport: Transport,
    tracker: ConnectionTracker,
    config: SessionConfig,
    inflight: Mutex<Option<(u64, InFlight)>>,
    generation: AtomicU64,
    ready_slot: ReadySlot,
    event_handler: EventSlot,
}

impl SessionBootstrap {
    /// Take ownership of the transport and install the reverse-channel
    /// dispatcher. Must be called within a tokio runtime.
    pub fn new(transport: Transport, tracker: ConnectionTracker, config: SessionConfig) -> Self {
        let ready_slot: ReadySlot = Arc::new(Mutex::new(None));
        let event_handler: EventSlot = Arc::new(Mutex::new(None));

        install_dispatcher(
            &transport,
            tracker.clone(),
            Arc::clone(&ready_slot),
            Arc::clone(&event_handler),
        );

        Self {
            transport,
            tracker,
            config,
            inflight: Mutex::new(None),
            generation: AtomicU64::new(0),
            ready_slot,
            event_handler,
        }
    }

    /// Bootstrap the node, or join the handshake already in flight.
    ///
    /// Single-flight: of any number of concurrent callers, exactly one
    /// `startZChainServer` is sent and all callers share the result. After
    /// success, later calls return the cached session without touching the
    /// wire.
    ///
    /// # Errors
    ///
    /// - [`SessionError::BootstrapTimeout`] — no readiness event within the
    ///   configured bound; connection status is left Disconnected. Retryable.
    /// - [`SessionError::BootstrapCancelled`] — [`teardown`](Self::teardown)
    ///   ran while the handshake was pending.
    /// - [`SessionError::Transport`] — the start signal could not be sent.
    pub async fn ensure_started(&self) -> Result<Session, SessionError> {
        let (generation, handshake) = {
            let mut inflight = lock_unpoisoned(&self.inflight);
            match inflight.as_ref() {
                Some((generation, handshake)) => (*generation, handshake.clone()),
                None => {
                    let generation = self.generation.fetch_add(1, Ordering::Relaxed);

                    // Arm the waiter before the start signal goes out so a
                    // fast node cannot answer into a missing listener.
                    let (ready_tx, ready_rx) = oneshot::channel();
                    *lock_unpoisoned(&self.ready_slot) = Some(ready_tx);

                    let handshake = run_handshake(
                        self.transport.clone(),
                        self.tracker.clone(),
                        self.config.bootstrap_timeout(),
                        Arc::clone(&self.ready_slot),
                        ready_rx,
                    )
                    .boxed()
                    .shared();

                    *inflight = Some((generation, handshake.clone()));
                    (generation, handshake)
                }
            }
        };

        let result = handshake.await;

        // Failure clears the slot so bootstrap stays retryable; the
        // generation check keeps a stale waiter from wiping out a handshake
        // some other caller has started since.
        if result.is_err() {
            let mut inflight = lock_unpoisoned(&self.inflight);
            if matches!(inflight.as_ref(), Some((current, _)) if *current == generation) {
                *inflight = None;
            }
        }

        result
    }

    /// The resolved session, if bootstrap has completed successfully.
    pub fn session(&self) -> Option<Session> {
        let inflight = lock_unpoisoned(&self.inflight);
        inflight
            .as_ref()
            .and_then(|(_, handshake)| handshake.peek())
            .and_then(|result| result.as_ref().ok())
            .cloned()
    }

    /// Register the application handler for node events the session layer
    /// does not consume itself. Last-registration-wins, like the channel
    /// subscription it mirrors.
    pub fn on_event(&self, handler: MessageHandler) {
        *lock_unpoisoned(&self.event_handler) = Some(handler);
    }

    /// Destroy the session and publish Disconnected.
    ///
    /// A pending handshake resolves as [`SessionError::BootstrapCancelled`];
    /// a resolved session is dropped. Nothing reconnects on its own — the
    /// next `ensure_started` call runs a fresh handshake.
    pub fn teardown(&self) {
        // Dropping the armed waiter cancels a pending handshake.
        *lock_unpoisoned(&self.ready_slot) = None;

        let had_state = lock_unpoisoned(&self.inflight).take().is_some();
        if had_state {
            info!("session torn down; next bootstrap starts from scratch");
        } else {
            debug!("teardown with no session or handshake in flight");
        }

        self.tracker.publish(ConnectionEvent::ChannelClosed);
    }
}

/// Route reverse-channel traffic: readiness to the armed waiter,
/// channel-closed to the lifecycle tracker, everything else to the
/// application handler.
fn install_dispatcher(
    transport: &Transport,
    tracker: ConnectionTracker,
    ready_slot: ReadySlot,
    event_handler: EventSlot,
) {
    let inbound = transport.pair().inbound().to_string();

    transport.on_message(Box::new(move |text| {
        let envelope = match Envelope::from_wire(&text) {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!("discarding malformed frame on {inbound}: {error}");
                return;
            }
        };

        match envelope.method.as_str() {
            EVENT_SERVER_STARTED => {
                let account = envelope
                    .payload
                    .get("account")
                    .and_then(|value| value.as_str())
                    .map(str::to_string);

                match lock_unpoisoned(&ready_slot).take() {
                    Some(ready) => {
                        // Receiver gone means the handshake already timed
                        // out; the late event is irrelevant either way.
                        let _ = ready.send(account);
                    }
                    None => debug!("ignoring {EVENT_SERVER_STARTED} with no handshake pending"),
                }
            }
            EVENT_SERVER_CLOSED => {
                info!("node reported channel closed");
                tracker.publish(ConnectionEvent::ChannelClosed);
            }
            _ => match lock_unpoisoned(&event_handler).as_mut() {
                Some(handler) => handler(text),
                None => debug!("no event handler registered; dropping '{}'", envelope.method),
            },
        }
    }));
}

/// The handshake itself. Runs once per bootstrap attempt, shared by every
/// concurrent caller.
async fn run_handshake(
    transport: Transport,
    tracker: ConnectionTracker,
    timeout: Duration,
    ready_slot: ReadySlot,
    ready_rx: oneshot::Receiver<Option<String>>,
) -> Result<Session, SessionError> {
    tracker.publish(ConnectionEvent::BootstrapStarted);
    info!(
        "bootstrap: sending {METHOD_START_SERVER}, waiting up to {}s",
        timeout.as_secs()
    );

    if let Err(error) = transport.send(&Envelope::event(METHOD_START_SERVER)) {
        *lock_unpoisoned(&ready_slot) = None;
        tracker.publish(ConnectionEvent::BootstrapFailed);
        return Err(error.into());
    }

    match time::timeout(timeout, ready_rx).await {
        Ok(Ok(account)) => {
            let session = Session::new(transport);
            tracker.publish(ConnectionEvent::BootstrapResolved {
                account: account.clone(),
            });
            info!("bootstrap: node ready, session {}", session.id());
            Ok(session)
        }
        Ok(Err(_released)) => {
            // Only teardown drops the armed waiter, and teardown publishes
            // the channel-closed transition itself. A failure published here
            // could land after a retry's Started event and wedge the machine
            // at Disconnected with a live session.
            Err(SessionError::BootstrapCancelled {
                message: "readiness waiter released before the node answered".to_string(),
                location: ErrorLocation::caller(),
            })
        }
        Err(_elapsed) => {
            // Disarm the waiter so a late readiness event cannot leak into
            // a later handshake.
            *lock_unpoisoned(&ready_slot) = None;
            tracker.publish(ConnectionEvent::BootstrapFailed);
            warn!(
                "bootstrap: no {EVENT_SERVER_STARTED} within {}s",
                timeout.as_secs()
            );
            Err(SessionError::BootstrapTimeout {
                timeout_secs: timeout.as_secs(),
                location: ErrorLocation::caller(),
            })
        }
    }
}
