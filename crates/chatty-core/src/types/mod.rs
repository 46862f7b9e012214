//! Shared domain types used across all Chatty crates.

pub mod id;
pub mod pagination;

pub use id::{GroupId, MessageId, UserId};
pub use pagination::{Connection, ConnectionArgs, Cursor, Edge, PageInfo};
