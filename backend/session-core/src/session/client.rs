//! Typed entry point the application uses to drive the node.

use crate::METHOD_INIT;
use crate::error::session::SessionError;
use crate::session::bootstrap::SessionBootstrap;

use common::ErrorLocation;

use std::sync::Arc;

use log::info;
use serde_json::json;

/// The command façade over an established session.
///
/// Pure pass-through: it guarantees the envelope shape is well-formed and
/// attaches no meaning to the payload. Whatever reads the node → UI channel
/// owns acknowledgements; no call here waits for one.
#[derive(Clone)]
pub struct ChainClient {
    bootstrap: Arc<SessionBootstrap>,
}

impl ChainClient {
    pub fn new(bootstrap: Arc<SessionBootstrap>) -> Self {
        Self { bootstrap }
    }

    /// Ask the node to connect to `address`.
    ///
    /// Sends exactly one `init` command carrying `{"address": ...}` and
    /// returns as soon as it is queued.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidAddress`] — empty address; nothing is sent.
    /// - [`SessionError::NotConnected`] — called before bootstrap resolved
    ///   (or after teardown). A defect at the call site, not a retry case.
    /// - [`SessionError::Transport`] — the command could not be framed or
    ///   queued.
    pub fn connect(&self, address: &str) -> Result<(), SessionError> {
        if address.is_empty() {
            return Err(SessionError::InvalidAddress {
                message: "connect() requires a non-empty address".to_string(),
                location: ErrorLocation::caller(),
            });
        }

        let session = self
            .bootstrap
            .session()
            .ok_or_else(|| SessionError::NotConnected {
                message: "connect() called without a bootstrapped session".to_string(),
                location: ErrorLocation::caller(),
            })?;

        session.send_command(METHOD_INIT, json!({ "address": address }))?;
        info!("queued init for address {address}");
        Ok(())
    }
}
