//! Frames exchanged over a streaming connection.

pub mod types;

pub use types::{InboundMessage, OutboundMessage, SubscribePayload};
