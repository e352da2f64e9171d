//! The handle representing a started, reachable node.

use crate::error::transport::TransportError;
use crate::transport::{Envelope, Transport};

use serde_json::Value;
use uuid::Uuid;

/// A live, bootstrapped connection to the zChain node.
///
/// Created only by a resolving bootstrap and destroyed by explicit teardown
/// or process exit; it is never recreated silently. Cloning shares the same
/// underlying transport.
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    transport: Transport,
}

impl Session {
    pub(crate) fn new(transport: Transport) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
        }
    }

    /// Identifier for logging and for telling sessions apart across
    /// re-bootstraps.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Frame `payload` as a command envelope and send it to the node.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Serialization`] if the payload is not
    /// representable as JSON, or the host's enqueue failure.
    pub fn send_command(&self, method: &str, payload: Value) -> Result<(), TransportError> {
        self.transport.send(&Envelope::command(method, payload))
    }
}
