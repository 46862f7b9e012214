//! Message-related domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GroupId, MessageId, UserId};

/// A message was posted to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreated {
    /// The new message.
    pub message_id: MessageId,
    /// Group the message was posted to.
    pub group_id: GroupId,
    /// Author of the message.
    pub author_id: UserId,
    /// Message body.
    pub text: String,
    /// When the message was stored.
    pub created_at: DateTime<Utc>,
    /// Group membership at publish time.
    pub member_ids: Vec<UserId>,
}
