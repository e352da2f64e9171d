//! Session bootstrap and the typed client façade.
//!
//! Turning "the node may or may not be running" into "the node is confirmed
//! ready, or we know it failed" happens here:
//!
//! 1. [`SessionBootstrap::ensure_started`] sends the start signal and waits
//!    (bounded) for the readiness event — single-flight, so concurrent
//!    callers share one handshake and one result.
//! 2. The resolved [`Session`] owns the transport for the rest of its life.
//! 3. [`ChainClient`] is what the application calls to issue commands.
//!
//! Lifecycle failures are published through the connection tracker; only
//! the bootstrap caller itself sees the error value.

mod bootstrap;
mod client;
mod handle;

pub use bootstrap::SessionBootstrap;
pub use client::ChainClient;
pub use handle::Session;
