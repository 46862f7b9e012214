//! Event publishing seam between the logic layer and the event bus.

use std::fmt::Debug;
use std::hash::Hash;

use crate::events::ChatEvent;

/// An event that belongs to exactly one bus topic.
pub trait Topical: Clone + Send + Sync + 'static {
    /// The topic key type.
    type Topic: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns the topic this event is published on.
    fn topic(&self) -> Self::Topic;
}

/// Fire-and-forget publisher of domain events.
///
/// `publish` enqueues synchronously and never fails; delivery to
/// subscribers happens asynchronously.
pub trait EventPublisher: Send + Sync + 'static {
    /// Publishes an event on its topic.
    fn publish(&self, event: ChatEvent);
}
