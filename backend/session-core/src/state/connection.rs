//! Connection lifecycle state machine.
//!
//! Tracks whether the zChain node is reachable:
//!
//! ```text
//! Disconnected --(bootstrap started)--> Connecting
//! Connecting   --(bootstrap resolves)--> Connected
//! Connecting   --(bootstrap fails)-----> Disconnected
//! Connected    --(channel closed)------> Disconnected
//! ```
//!
//! No terminal state: node restarts are expected over the life of the UI
//! process, so the machine re-enters Connecting indefinitely.
//!
//! # Architecture
//!
//! Uses an actor pattern so all transitions are serialized:
//! - Events are sent via an mpsc channel (sync, so transport handlers can
//!   publish without an async context)
//! - A dedicated task applies the transition table sequentially
//! - Observers subscribe to a watch channel and only ever see complete
//!   snapshots

use serde::Serialize;

use log::{info, warn};
use tokio::sync::{mpsc, watch};

/// Exactly one value holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Status plus its associated value, published atomically as one unit.
///
/// The last known account survives a disconnect so the UI can label the
/// retry prompt; `status` is the authoritative reachability signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionSnapshot {
    pub status: ConnectionStatus,
    pub account: Option<String>,
}

impl Default for ConnectionSnapshot {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            account: None,
        }
    }
}

/// Everything that can move the machine.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    BootstrapStarted,
    BootstrapResolved { account: Option<String> },
    BootstrapFailed,
    ChannelClosed,
}

/// Total transition function: every (state, event) pair resolves to exactly
/// one next state. Combinations outside the table keep the current state,
/// which is what makes Disconnected → Connected without a bootstrap
/// impossible.
pub(crate) fn next_status(current: ConnectionStatus, event: &ConnectionEvent) -> ConnectionStatus {
    use ConnectionStatus::{Connected, Connecting, Disconnected};

    match (current, event) {
        (Disconnected, ConnectionEvent::BootstrapStarted) => Connecting,
        (Connecting, ConnectionEvent::BootstrapResolved { .. }) => Connected,
        (Connecting, ConnectionEvent::BootstrapFailed) => Disconnected,
        // A vanished channel forces Disconnected from anywhere.
        (_, ConnectionEvent::ChannelClosed) => Disconnected,
        (current, _) => current,
    }
}

/// Single-writer tracker for the connection lifecycle.
///
/// # Thread Safety
///
/// `Clone` shares the same reducer; only the reducer task mutates state.
#[derive(Clone)]
pub struct ConnectionTracker {
    event_tx: mpsc::UnboundedSender<ConnectionEvent>,
    snapshot_rx: watch::Receiver<ConnectionSnapshot>,
}

impl ConnectionTracker {
    /// Spawn the reducer task. Must be called within a tokio runtime.
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(ConnectionSnapshot::default());

        tokio::spawn(reducer(event_rx, snapshot_tx));

        Self {
            event_tx,
            snapshot_rx,
        }
    }

    /// Feed one event to the reducer.
    ///
    /// Synchronous so it can be called from a transport message handler.
    /// If the reducer is gone (runtime shutdown) the event is logged and
    /// dropped; there is no one left to observe the state anyway.
    pub fn publish(&self, event: ConnectionEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("connection reducer stopped; dropping lifecycle event");
        }
    }

    /// Subscribe to snapshots. The receiver immediately holds the current one.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionSnapshot> {
        self.snapshot_rx.clone()
    }

    /// The current snapshot, cloned out.
    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.snapshot_rx.borrow().clone()
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// The reducer task: owns the state, applies events sequentially, publishes
/// each result as one snapshot. Runs until every tracker handle is dropped.
async fn reducer(
    mut event_rx: mpsc::UnboundedReceiver<ConnectionEvent>,
    snapshot_tx: watch::Sender<ConnectionSnapshot>,
) {
    let mut snapshot = ConnectionSnapshot::default();

    while let Some(event) = event_rx.recv().await {
        let next = next_status(snapshot.status, &event);

        if let ConnectionEvent::BootstrapResolved { account } = &event {
            if snapshot.status == ConnectionStatus::Connecting {
                snapshot.account = account.clone();
            }
        }

        if next != snapshot.status {
            info!("connection status {:?} -> {:?}", snapshot.status, next);
        }

        snapshot.status = next;
        // Receivers may all be gone; that is not an error for the reducer.
        let _ = snapshot_tx.send(snapshot.clone());
    }
}
