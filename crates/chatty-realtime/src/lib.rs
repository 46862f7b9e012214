//! # chatty-realtime
//!
//! Push delivery of domain events to authorized subscribers:
//!
//! - `bus`: generic in-process publish/subscribe keyed by topic
//! - `filter`: subscription establishment checks and per-event predicates
//! - `protocol`: JSON frames exchanged over a streaming connection
//! - `connection`: connection authentication, per-connection operation
//!   tracking, and the connection manager

pub mod bus;
pub mod connection;
pub mod filter;
pub mod protocol;

pub use bus::{EventBus, EventFilter, Registration, Subscription};
pub use connection::authenticator::ConnectionAuthenticator;
pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::manager::ConnectionManager;
pub use filter::SubscriptionAuthorizer;
pub use protocol::{InboundMessage, OutboundMessage, SubscribePayload};
