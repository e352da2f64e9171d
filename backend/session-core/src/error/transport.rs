use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Failures local to the transport channel.
///
/// These surface synchronously to the immediate caller. Lifecycle failures
/// (service gone, handshake timeout) are reported through status snapshots
/// instead, so unrelated in-flight callers are not interrupted.
///
/// `Clone` is required because bootstrap fans one result out to every
/// caller sharing the in-flight handshake.
#[derive(Debug, Clone, ThisError)]
pub enum TransportError {
    #[error("Serialization Error: {message} {location}")]
    Serialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Send Error: channel {channel}: {message} {location}")]
    Send {
        channel: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Channel Closed Error: {channel} {location}")]
    ChannelClosed {
        channel: String,
        location: ErrorLocation,
    },

    #[error("Invalid Channel Pair Error: {message} {location}")]
    InvalidChannelPair {
        message: String,
        location: ErrorLocation,
    },
}

impl From<serde_json::Error> for TransportError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        TransportError::Serialization {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
