//! Topic-keyed publish/subscribe.

pub mod event_bus;
pub mod subscription;

pub use event_bus::{EventBus, EventFilter};
pub use subscription::{Registration, Subscription};
