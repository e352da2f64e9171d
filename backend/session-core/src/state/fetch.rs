//! Fetch lifecycle state machine, applied per logical resource.
//!
//! `value` holds the last known good data and survives both in-flight and
//! failed fetches: an empty default would be indistinguishable from "never
//! fetched". Replace-on-success, preserve-on-pending.

use std::sync::Arc;

use log::debug;
use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchStatus {
    Idle,
    Fetching,
    Failed,
}

/// Status and last good value, delivered together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchSnapshot<T> {
    pub status: FetchStatus,
    pub value: Option<T>,
}

/// Single-writer tracker for one resource (e.g. the channel list, the
/// active account).
///
/// Mutations go through [`begin`](Self::begin), [`complete`](Self::complete)
/// and [`fail`](Self::fail) only; observers receive snapshots via a watch
/// channel and never a mutable reference.
#[derive(Clone)]
pub struct FetchTracker<T> {
    snapshot_tx: Arc<watch::Sender<FetchSnapshot<T>>>,
}

impl<T: Clone + Send + Sync + 'static> FetchTracker<T> {
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(FetchSnapshot {
            status: FetchStatus::Idle,
            value: None,
        });

        Self {
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    /// Mark a request issued.
    ///
    /// Returns `false` without publishing anything when a fetch is already
    /// in flight: observers must not see the status regress or repeat while
    /// the first request is pending. The caller decides whether to re-run
    /// the underlying call anyway.
    pub fn begin(&self) -> bool {
        self.snapshot_tx.send_if_modified(|snapshot| {
            if snapshot.status == FetchStatus::Fetching {
                debug!("fetch already in flight; status unchanged");
                false
            } else {
                snapshot.status = FetchStatus::Fetching;
                true
            }
        })
    }

    /// Record a successful response, replacing the value.
    pub fn complete(&self, value: T) {
        self.snapshot_tx.send_modify(|snapshot| {
            snapshot.status = FetchStatus::Idle;
            snapshot.value = Some(value);
        });
    }

    /// Record a failure. The last good value is left untouched.
    pub fn fail(&self) {
        self.snapshot_tx.send_modify(|snapshot| {
            snapshot.status = FetchStatus::Failed;
        });
    }

    /// Subscribe to snapshots. The receiver immediately holds the current one.
    pub fn subscribe(&self) -> watch::Receiver<FetchSnapshot<T>> {
        self.snapshot_tx.subscribe()
    }

    /// The current snapshot, cloned out.
    pub fn snapshot(&self) -> FetchSnapshot<T> {
        self.snapshot_tx.borrow().clone()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for FetchTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}
