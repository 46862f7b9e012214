//! Group models.

pub mod model;

pub use model::{Group, NewGroup};
