//! Directional channel pair and the transport facade over a [`ChannelHost`].

use crate::error::transport::TransportError;
use crate::transport::envelope::Envelope;
use crate::transport::host::{ChannelHost, MessageHandler};
use crate::{ZCHAIN_INBOUND_CHANNEL, ZCHAIN_OUTBOUND_CHANNEL};

use common::ErrorLocation;

use std::sync::Arc;

use log::debug;

/// The two fixed channel names, one per direction.
///
/// Agreed upon by both processes at build time. The directions must never
/// share a name: a shared name would loop every sent message straight back
/// to its own sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPair {
    outbound: String,
    inbound: String,
}

impl ChannelPair {
    /// Build a pair from explicit names.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidChannelPair`] if either name is
    /// empty or the two names are equal.
    pub fn new(outbound: &str, inbound: &str) -> Result<Self, TransportError> {
        if outbound.is_empty() || inbound.is_empty() {
            return Err(TransportError::InvalidChannelPair {
                message: "channel names must be non-empty".to_string(),
                location: ErrorLocation::caller(),
            });
        }

        if outbound == inbound {
            return Err(TransportError::InvalidChannelPair {
                message: format!("both directions named '{outbound}' (echo loop)"),
                location: ErrorLocation::caller(),
            });
        }

        Ok(Self {
            outbound: outbound.to_string(),
            inbound: inbound.to_string(),
        })
    }

    /// The fixed zChain channel names.
    pub fn zchain() -> Self {
        Self {
            outbound: ZCHAIN_OUTBOUND_CHANNEL.to_string(),
            inbound: ZCHAIN_INBOUND_CHANNEL.to_string(),
        }
    }

    /// UI → node channel name.
    pub fn outbound(&self) -> &str {
        &self.outbound
    }

    /// Node → UI channel name.
    pub fn inbound(&self) -> &str {
        &self.inbound
    }
}

impl Default for ChannelPair {
    fn default() -> Self {
        Self::zchain()
    }
}

/// Typed sender/subscriber over one channel pair.
///
/// Owned exclusively by the session bootstrap during the handshake, then
/// shared (cloned) into the resolved session for the rest of its life.
///
/// # Thread Safety
///
/// `Clone` shares the same underlying host; all clones speak over the same
/// two channels.
#[derive(Clone)]
pub struct Transport {
    host: Arc<dyn ChannelHost>,
    pair: ChannelPair,
}

impl Transport {
    pub fn new(host: Arc<dyn ChannelHost>, pair: ChannelPair) -> Self {
        Self { host, pair }
    }

    /// Send an envelope on the UI → node channel.
    ///
    /// Fire-and-forget: never blocks the caller beyond local serialization.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Serialization`] if the envelope is not
    /// representable as JSON, or whatever the host reports for a failed
    /// enqueue.
    pub fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let text = envelope.to_wire()?;
        debug!(
            "sending '{}' on {} ({} bytes)",
            envelope.method,
            self.pair.outbound(),
            text.len()
        );
        self.host.send(self.pair.outbound(), text)
    }

    /// Register the handler for the node → UI channel.
    ///
    /// Last-registration-wins, as documented on
    /// [`ChannelHost::subscribe`].
    pub fn on_message(&self, handler: MessageHandler) {
        self.host.subscribe(self.pair.inbound(), handler);
    }

    pub fn pair(&self) -> &ChannelPair {
        &self.pair
    }
}
