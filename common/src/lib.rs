//! Shared plumbing for the zChain desktop workspace.
//!
//! This crate contains pure data structures passed between layers. It has
//! no business logic.
//!
//! ## Architecture
//!
//! - **common** (this crate): Shared data structures
//! - **session-core**: IPC transport, session bootstrap, and lifecycle state
//!
//! Keeping these types in a leaf crate avoids dependency cycles between the
//! core and any application shell built on top of it.

pub mod error;

pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;
