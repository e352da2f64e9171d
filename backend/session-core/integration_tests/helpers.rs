//! Test helpers for the session integration tests.
//!
//! Two fakes stand in for the host runtime:
//! - [`RecordingHost`] — records every send and lets the test play the node
//!   by emitting frames into the subscribed handler directly.
//! - A scripted node attached to an [`InMemoryHost`] — answers the start
//!   signal with a delayed readiness event, like a real cold-starting node.

use session_core::config::SessionConfig;
use session_core::error::transport::TransportError;
use session_core::session::SessionBootstrap;
use session_core::state::ConnectionTracker;
use session_core::transport::{
    ChannelHost, ChannelPair, Envelope, InMemoryHost, MessageHandler, Transport,
};
use session_core::{EVENT_SERVER_STARTED, METHOD_START_SERVER};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Address used by the connect scenarios.
pub const TEST_ADDRESS: &str = "0x000...00A";

/// Default config with a test-sized bootstrap timeout.
pub fn test_config(timeout_secs: u64) -> SessionConfig {
    let mut config = SessionConfig::default();
    config.bootstrap_timeout_secs = timeout_secs;
    config
}

/// Host fake that records all outbound traffic and never answers on its own.
///
/// The test acts as the node by calling [`emit`](Self::emit).
#[derive(Default)]
pub struct RecordingHost {
    sent: Mutex<Vec<(String, String)>>,
    handlers: Mutex<HashMap<String, MessageHandler>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Decoded envelopes recorded on `channel`, in send order.
    pub fn sent_on(&self, channel: &str) -> Vec<Envelope> {
        self.sent
            .lock()
            .expect("Recorder lock poisoned")
            .iter()
            .filter(|(name, _)| name == channel)
            .map(|(_, text)| Envelope::from_wire(text).expect("Recorded frame should decode"))
            .collect()
    }

    /// How many envelopes with `method` were sent on `channel`.
    pub fn count_method(&self, channel: &str, method: &str) -> usize {
        self.sent_on(channel)
            .iter()
            .filter(|envelope| envelope.method == method)
            .count()
    }

    /// Deliver an envelope to whatever handler is subscribed on `channel`,
    /// as if the node had sent it.
    pub fn emit(&self, channel: &str, envelope: &Envelope) {
        let text = envelope.to_wire().expect("Failed to encode test frame");
        let mut handlers = self.handlers.lock().expect("Handler lock poisoned");
        let handler = handlers
            .get_mut(channel)
            .expect("No handler subscribed on emitted channel");
        handler(text);
    }
}

impl ChannelHost for RecordingHost {
    fn send(&self, channel: &str, text: String) -> Result<(), TransportError> {
        self.sent
            .lock()
            .expect("Recorder lock poisoned")
            .push((channel.to_string(), text));
        Ok(())
    }

    fn subscribe(&self, channel: &str, handler: MessageHandler) {
        self.handlers
            .lock()
            .expect("Handler lock poisoned")
            .insert(channel.to_string(), handler);
    }
}

/// Everything a session test needs, wired over a [`RecordingHost`].
pub struct RecordingHarness {
    pub host: Arc<RecordingHost>,
    pub pair: ChannelPair,
    pub tracker: ConnectionTracker,
    pub bootstrap: Arc<SessionBootstrap>,
}

pub fn recording_harness(timeout_secs: u64) -> RecordingHarness {
    let host = RecordingHost::new();
    let pair = ChannelPair::zchain();
    let tracker = ConnectionTracker::new();
    let transport = Transport::new(
        Arc::clone(&host) as Arc<dyn ChannelHost>,
        pair.clone(),
    );
    let bootstrap = Arc::new(SessionBootstrap::new(
        transport,
        tracker.clone(),
        test_config(timeout_secs),
    ));

    RecordingHarness {
        host,
        pair,
        tracker,
        bootstrap,
    }
}

/// Resolve the harness's bootstrap by playing a node that answers readiness
/// immediately.
pub async fn resolve_bootstrap(harness: &RecordingHarness) {
    let bootstrap = Arc::clone(&harness.bootstrap);
    let handshake = tokio::spawn(async move { bootstrap.ensure_started().await });

    // Let the handshake send its start signal before answering.
    tokio::time::sleep(Duration::from_millis(20)).await;
    harness
        .host
        .emit(harness.pair.inbound(), &Envelope::event(EVENT_SERVER_STARTED));

    handshake
        .await
        .expect("Handshake task panicked")
        .expect("Bootstrap should resolve");
}

/// Attach a scripted node to an in-memory host: it answers the start signal
/// with a readiness event after `ready_delay`.
pub fn attach_scripted_node(host: &Arc<InMemoryHost>, pair: &ChannelPair, ready_delay: Duration) {
    let reply_host = Arc::clone(host);
    let reply_channel = pair.inbound().to_string();

    host.subscribe(
        pair.outbound(),
        Box::new(move |text| {
            let envelope = Envelope::from_wire(&text).expect("Node received malformed frame");
            if envelope.method == METHOD_START_SERVER {
                let host = Arc::clone(&reply_host);
                let channel = reply_channel.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(ready_delay).await;
                    let wire = Envelope::event(EVENT_SERVER_STARTED)
                        .to_wire()
                        .expect("Failed to encode readiness");
                    host.send(&channel, wire).expect("Readiness send failed");
                });
            }
        }),
    );
}

/// Everything a session test needs, wired over an [`InMemoryHost`] with a
/// scripted node behind it.
pub struct NodeHarness {
    pub host: Arc<InMemoryHost>,
    pub pair: ChannelPair,
    pub tracker: ConnectionTracker,
    pub bootstrap: Arc<SessionBootstrap>,
}

pub fn node_harness(ready_delay: Duration, timeout_secs: u64) -> NodeHarness {
    let host = Arc::new(InMemoryHost::new());
    let pair = ChannelPair::zchain();
    attach_scripted_node(&host, &pair, ready_delay);

    let tracker = ConnectionTracker::new();
    let transport = Transport::new(
        Arc::clone(&host) as Arc<dyn ChannelHost>,
        pair.clone(),
    );
    let bootstrap = Arc::new(SessionBootstrap::new(
        transport,
        tracker.clone(),
        test_config(timeout_secs),
    ));

    NodeHarness {
        host,
        pair,
        tracker,
        bootstrap,
    }
}
