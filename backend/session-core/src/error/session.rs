use crate::error::transport::TransportError;

use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Failures of the session layer (bootstrap handshake and client façade).
#[derive(Debug, Clone, ThisError)]
pub enum SessionError {
    /// The node never signalled readiness within the configured bound.
    /// Retryable: connection status is left at Disconnected so the UI can
    /// offer a retry action.
    #[error("Bootstrap Timeout Error: node not ready after {timeout_secs}s {location}")]
    BootstrapTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    /// The readiness waiter was released before it fired (explicit teardown
    /// while a handshake was pending).
    #[error("Bootstrap Cancelled Error: {message} {location}")]
    BootstrapCancelled {
        message: String,
        location: ErrorLocation,
    },

    /// An operation that needs a live session ran before bootstrap resolved.
    /// A contract violation to fix at the call site, not a retry case.
    #[error("Not Connected Error: {message} {location}")]
    NotConnected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Address Error: {message} {location}")]
    InvalidAddress {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}
