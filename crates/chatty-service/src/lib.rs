//! # chatty-service
//!
//! The authorization logic layer. Every guarded entry point takes the
//! caller's [`AuthContext`](chatty_auth::AuthContext), awaits its identity
//! once at the top, applies an operation-specific predicate, and either
//! returns data or fails with the opaque `Unauthorized` error.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod access;
pub mod auth;
pub mod group;
pub mod message;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthPayload, AuthService, SignupInput};
pub use group::{CreateGroupInput, GroupLogic};
pub use message::{CreateMessageInput, MessageLogic};
pub use user::{UserLogic, UserQuery};
