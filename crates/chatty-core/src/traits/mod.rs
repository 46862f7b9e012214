//! Core traits defined in `chatty-core` and implemented by other crates.

pub mod publisher;

pub use publisher::{EventPublisher, Topical};
