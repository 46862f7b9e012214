//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatty_core::types::{GroupId, MessageId, UserId};

/// A message posted to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier. Increases with posting order.
    pub id: MessageId,
    /// Group the message belongs to.
    pub group_id: GroupId,
    /// Author.
    pub user_id: UserId,
    /// Message body.
    pub text: String,
    /// When the message was posted.
    pub created_at: DateTime<Utc>,
}

/// Data required to post a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// Target group.
    pub group_id: GroupId,
    /// Author.
    pub user_id: UserId,
    /// Message body.
    pub text: String,
}
