//! # chatty-core
//!
//! Core crate for Chatty. Contains configuration schemas, typed
//! identifiers, cursor pagination types, domain events, the event
//! publishing seam, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Chatty crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
