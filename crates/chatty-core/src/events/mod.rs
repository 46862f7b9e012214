//! Domain events emitted by Chatty operations.
//!
//! Events are published through the event bus and filtered per
//! subscriber by the realtime subscription layer. Each variant carries
//! its own strongly typed payload and maps to exactly one [`Topic`].

pub mod group;
pub mod message;

use serde::{Deserialize, Serialize};

pub use group::GroupCreated;
pub use message::MessageCreated;

use crate::traits::Topical;

/// Event bus topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// A message was posted to a group.
    MessageCreated,
    /// A group was created.
    GroupCreated,
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MessageCreated => write!(f, "message_created"),
            Self::GroupCreated => write!(f, "group_created"),
        }
    }
}

/// Union of all domain events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was posted to a group.
    MessageCreated(MessageCreated),
    /// A group was created.
    GroupCreated(GroupCreated),
}

impl Topical for ChatEvent {
    type Topic = Topic;

    fn topic(&self) -> Topic {
        match self {
            Self::MessageCreated(_) => Topic::MessageCreated,
            Self::GroupCreated(_) => Topic::GroupCreated,
        }
    }
}
