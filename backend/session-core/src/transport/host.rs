//! The capability interface supplied by the host process runtime.

use crate::error::transport::TransportError;

/// Callback invoked for every message delivered on a subscribed channel.
///
/// Handlers receive the raw wire text; envelope decoding happens in the
/// subscriber so malformed frames can be logged and discarded in one place.
pub type MessageHandler = Box<dyn FnMut(String) + Send + 'static>;

/// The two process-level primitives the core depends on.
///
/// In production this wraps whatever the host window system provides for
/// cross-process messaging. The core never touches the host runtime through
/// any other path, which keeps the whole session layer testable with
/// [`InMemoryHost`](crate::transport::InMemoryHost).
pub trait ChannelHost: Send + Sync + 'static {
    /// Deliver `text` to whoever is subscribed to `channel`.
    ///
    /// Fire-and-forget: must not block beyond enqueueing. Messages sent by
    /// one sender on one channel are delivered FIFO.
    fn send(&self, channel: &str, text: String) -> Result<(), TransportError>;

    /// Register the handler for `channel`.
    ///
    /// Exactly one handler exists per channel: registering a second handler
    /// replaces the first (last-registration-wins). Handlers are never
    /// silently stacked.
    fn subscribe(&self, channel: &str, handler: MessageHandler);
}
