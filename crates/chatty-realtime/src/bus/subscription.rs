//! Subscriber-side handle of a bus registration.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use chatty_core::traits::Topical;

use super::event_bus::{Registry, SubscriberId};

/// A live registration on the event bus.
///
/// Yields accepted events in publish order. The registration is released
/// when the handle is dropped or [`unsubscribe`](Self::unsubscribe)d.
pub struct Subscription<E: Topical> {
    id: SubscriberId,
    topic: E::Topic,
    receiver: mpsc::Receiver<E>,
    registry: Arc<Registry<E>>,
}

impl<E: Topical> Subscription<E> {
    pub(crate) fn new(
        id: SubscriberId,
        topic: E::Topic,
        receiver: mpsc::Receiver<E>,
        registry: Arc<Registry<E>>,
    ) -> Self {
        Self {
            id,
            topic,
            receiver,
            registry,
        }
    }

    /// Registration id.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Topic this subscription listens on.
    pub fn topic(&self) -> E::Topic {
        self.topic
    }

    /// Waits for the next accepted event.
    pub async fn recv(&mut self) -> Option<E> {
        self.receiver.recv().await
    }

    /// Returns an already queued event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        self.receiver.try_recv().ok()
    }

    /// Releases the registration.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// A detached handle that can release this registration from elsewhere.
    pub fn registration(&self) -> Registration<E> {
        Registration {
            id: self.id,
            topic: self.topic,
            registry: self.registry.clone(),
        }
    }
}

/// Releases a bus registration without owning its [`Subscription`].
///
/// Once released, the subscription yields whatever is already queued and
/// then ends.
pub struct Registration<E: Topical> {
    id: SubscriberId,
    topic: E::Topic,
    registry: Arc<Registry<E>>,
}

impl<E: Topical> Registration<E> {
    /// Removes the registration. Returns `true` if it was still live.
    pub fn release(&self) -> bool {
        self.registry.remove(self.topic, self.id)
    }
}

impl<E: Topical> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.registry.remove(self.topic, self.id);
    }
}

// Nothing is pinned structurally; the receiver is polled by `&mut`.
impl<E: Topical> Unpin for Subscription<E> {}

impl<E: Topical> Stream for Subscription<E> {
    type Item = E;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<E>> {
        self.receiver.poll_recv(cx)
    }
}

impl<E: Topical> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish()
    }
}
