//! Message models.

pub mod model;

pub use model::{Message, NewMessage};
