//! Session core for the zChain desktop shell.
//!
//! This crate is the messaging layer between a UI process and the hidden
//! zChain node process it drives. It contains no rendering or application
//! protocol logic; it frames commands, runs the startup handshake, and
//! publishes connection/fetch lifecycle state for the UI to observe.
//!
//! The host runtime (Electron-style window plumbing, or an in-memory fake in
//! tests) is injected through [`transport::ChannelHost`], the only capability
//! this crate requires from its environment.

pub mod config;
pub mod error;
pub mod session;
pub mod state;
mod sync;
pub mod transport;

#[cfg(test)]
mod tests;

/// Prefix shared by both IPC channel names.
pub const ZCHAIN_CHANNEL_PREFIX: &str = "zchain-ipc-transport-";

/// UI → node channel. Fixed at build time, never negotiated.
pub const ZCHAIN_OUTBOUND_CHANNEL: &str = const_format::concatcp!(ZCHAIN_CHANNEL_PREFIX, "main");

/// Node → UI channel. Must differ from the outbound name or messages echo.
pub const ZCHAIN_INBOUND_CHANNEL: &str = const_format::concatcp!(ZCHAIN_CHANNEL_PREFIX, "renderer");

/// Handshake verb sent by the UI to start (or attach to) the node process.
pub const METHOD_START_SERVER: &str = "startZChainServer";

/// Readiness event emitted by the node once it can accept commands.
pub const EVENT_SERVER_STARTED: &str = "ZChainServerStarted";

/// Emitted when the node side of the channel goes away.
pub const EVENT_SERVER_CLOSED: &str = "ZChainServerClosed";

/// Command carrying the chain address the node should connect to.
pub const METHOD_INIT: &str = "init";
