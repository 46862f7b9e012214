//! In-process event bus.
//!
//! Publishing is synchronous: the event is offered to every subscriber of
//! its topic whose filter accepts it and pushed into that subscriber's
//! bounded queue. Delivery happens when the subscriber polls. Each queue is
//! FIFO, so a subscriber sees events of one topic in publish order.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use chatty_core::events::ChatEvent;
use chatty_core::result::AppResult;
use chatty_core::traits::{EventPublisher, Topical};

use super::subscription::Subscription;

/// Per-subscriber delivery predicate. `false` or an error drops the event
/// for that subscriber only.
pub type EventFilter<E> = Arc<dyn Fn(&E) -> AppResult<bool> + Send + Sync>;

/// Identifier of one registration on the bus.
pub type SubscriberId = u64;

/// One registered delivery target.
pub(crate) struct Subscriber<E> {
    filter: EventFilter<E>,
    sender: mpsc::Sender<E>,
}

impl<E> Clone for Subscriber<E> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            sender: self.sender.clone(),
        }
    }
}

/// Shared subscriber registry.
pub(crate) struct Registry<E: Topical> {
    /// Topic → subscriber id → subscriber.
    topics: DashMap<E::Topic, HashMap<SubscriberId, Subscriber<E>>>,
    /// Source of subscriber ids.
    next_id: AtomicU64,
    /// Capacity of each subscriber queue.
    buffer_size: usize,
}

impl<E: Topical> Registry<E> {
    /// Removes a subscriber. Returns `true` if it was registered.
    pub(crate) fn remove(&self, topic: E::Topic, id: SubscriberId) -> bool {
        let removed = self
            .topics
            .get_mut(&topic)
            .is_some_and(|mut subs| subs.remove(&id).is_some());
        self.topics.remove_if(&topic, |_, subs| subs.is_empty());
        removed
    }
}

/// Generic event bus parameterized over a tagged event type.
///
/// Cloning is cheap; clones share the same registry.
pub struct EventBus<E: Topical> {
    registry: Arc<Registry<E>>,
}

impl<E: Topical> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<E: Topical> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.registry.topics.len())
            .field("buffer_size", &self.registry.buffer_size)
            .finish()
    }
}

impl<E: Topical> EventBus<E> {
    /// Creates an empty bus whose subscriber queues hold `buffer_size` events.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            registry: Arc::new(Registry {
                topics: DashMap::new(),
                next_id: AtomicU64::new(1),
                buffer_size: buffer_size.max(1),
            }),
        }
    }

    /// Registers a subscriber on `topic`.
    ///
    /// Dropping the returned handle removes the registration.
    pub fn subscribe(&self, topic: E::Topic, filter: EventFilter<E>) -> Subscription<E> {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.registry.buffer_size);

        self.registry
            .topics
            .entry(topic)
            .or_default()
            .insert(id, Subscriber { filter, sender });

        debug!(subscriber_id = id, topic = ?topic, "Subscriber registered");
        Subscription::new(id, topic, receiver, self.registry.clone())
    }

    /// Offers `event` to every subscriber of its topic.
    ///
    /// Never blocks and never fails. Returns how many subscribers accepted it.
    pub fn publish(&self, event: E) -> usize {
        let topic = event.topic();

        // Copy the targets out so no shard lock is held while filters run
        // or while subscribers are added and removed.
        let targets: Vec<(SubscriberId, Subscriber<E>)> = match self.registry.topics.get(&topic) {
            Some(subs) => subs.iter().map(|(id, s)| (*id, s.clone())).collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for (id, subscriber) in targets {
            match (subscriber.filter)(&event) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    debug!(subscriber_id = id, error = %e, "Filter failed, event dropped");
                    continue;
                }
            }

            match subscriber.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber_id = id, topic = ?topic, "Subscriber queue full, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    self.registry.remove(topic, id);
                }
            }
        }
        delivered
    }

    /// Number of live registrations on `topic`.
    pub fn subscriber_count(&self, topic: E::Topic) -> usize {
        self.registry
            .topics
            .get(&topic)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Number of live registrations across all topics.
    pub fn total_subscribers(&self) -> usize {
        self.registry.topics.iter().map(|subs| subs.len()).sum()
    }
}

impl EventPublisher for EventBus<ChatEvent> {
    fn publish(&self, event: ChatEvent) {
        let topic = event.topic();
        let delivered = EventBus::publish(self, event);
        debug!(topic = %topic, delivered, "Event published");
    }
}
