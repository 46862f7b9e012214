//! # chatty-store
//!
//! Repository traits for everything the authorization core reads or
//! writes, plus an in-memory implementation.
//!
//! - `repository`: `UserRepository` (the credential store), `GroupRepository`,
//!   `MessageRepository`
//! - `memory`: `MemoryStore`, a process-local implementation of all three

pub mod memory;
pub mod repository;

pub use memory::MemoryStore;
pub use repository::{GroupRepository, MessageRepository, UserRepository};
