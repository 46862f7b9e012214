//! Message creation and field resolution.

pub mod logic;

pub use logic::{CreateMessageInput, MessageLogic};
