//! Lifecycle state published to the UI.
//!
//! Both trackers follow the same shape: a single-writer reducer owns the
//! state, and observers receive immutable snapshots through a
//! `tokio::sync::watch` channel. A snapshot always carries the status and
//! its associated value together, so readers never see a half-applied
//! transition.

mod connection;
mod fetch;

pub use connection::{ConnectionEvent, ConnectionSnapshot, ConnectionStatus, ConnectionTracker};
pub(crate) use connection::next_status;
pub use fetch::{FetchSnapshot, FetchStatus, FetchTracker};
