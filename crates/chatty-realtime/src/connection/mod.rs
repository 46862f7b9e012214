//! Streaming connection lifecycle.
//!
//! A connection authenticates once with its first frame. The resulting
//! context is fixed for the lifetime of the connection and is not
//! re-validated if the identity's token version changes later.

pub mod authenticator;
pub mod handle;
pub mod manager;
