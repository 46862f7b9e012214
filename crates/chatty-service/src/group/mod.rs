//! Group queries, fields, and membership-scoped mutations.

pub mod logic;

pub use logic::{CreateGroupInput, GroupLogic};
