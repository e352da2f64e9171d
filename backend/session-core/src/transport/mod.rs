//! Message-framed IPC channel between the UI process and the zChain node.
//!
//! Two fixed, directional channel names carry UTF-8 JSON envelopes:
//!
//! - [`crate::ZCHAIN_OUTBOUND_CHANNEL`] — UI → node commands
//! - [`crate::ZCHAIN_INBOUND_CHANNEL`] — node → UI events
//!
//! The host process runtime supplies exactly two primitives (send and
//! subscribe) through [`ChannelHost`]; nothing else is required from the
//! environment. Tests and single-process embeddings substitute
//! [`InMemoryHost`].
//!
//! # Ordering
//!
//! Messages from one sender on one channel arrive in send order (FIFO per
//! channel). No ordering holds across the two directions.

mod channel;
mod envelope;
mod host;
mod memory;

pub use channel::{ChannelPair, Transport};
pub use envelope::{ENVELOPE_VERSION, Envelope};
pub use host::{ChannelHost, MessageHandler};
pub use memory::InMemoryHost;
