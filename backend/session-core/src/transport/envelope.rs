//! The wire envelope: a thin frame, not an RPC schema.

use crate::error::transport::TransportError;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Current envelope schema version.
///
/// The original protocol had no version field; peers that omit it are read
/// as version 1 so older nodes keep working.
pub const ENVELOPE_VERSION: u32 = 1;

/// A framed message: `{v, method, payload, correlationId?}` as UTF-8 JSON.
///
/// `method` is a transport-level verb (`init`, `startZChainServer`), not an
/// application RPC name. Payload semantics are opaque to this layer.
/// Envelopes are immutable once sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default = "default_version")]
    pub v: u32,

    pub method: String,

    #[serde(default = "empty_payload")]
    pub payload: Value,

    /// Attached to commands so a future acknowledgement path can pair
    /// responses with requests. Events carry none.
    #[serde(
        rename = "correlationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correlation_id: Option<String>,
}

fn default_version() -> u32 {
    ENVELOPE_VERSION
}

fn empty_payload() -> Value {
    Value::Object(Map::new())
}

impl Envelope {
    /// An event frame: no payload, no correlation id.
    pub fn event(method: &str) -> Self {
        Self {
            v: ENVELOPE_VERSION,
            method: method.to_string(),
            payload: empty_payload(),
            correlation_id: None,
        }
    }

    /// A command frame carrying `payload` and a fresh correlation id.
    pub fn command(method: &str, payload: Value) -> Self {
        Self {
            v: ENVELOPE_VERSION,
            method: method.to_string(),
            payload,
            correlation_id: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Serialize for the wire.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Serialization`] if the payload cannot be
    /// represented as JSON.
    pub fn to_wire(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a frame received from the reverse channel.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Serialization`] on malformed JSON or a
    /// frame missing its `method`.
    pub fn from_wire(text: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(text)?)
    }
}
