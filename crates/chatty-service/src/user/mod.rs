//! Identity queries and field resolution.

pub mod logic;

pub use logic::{UserLogic, UserQuery};
