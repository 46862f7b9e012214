//! Group-related domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GroupId, UserId};

/// A group was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCreated {
    /// The new group.
    pub group_id: GroupId,
    /// Group name.
    pub name: String,
    /// Identity that created the group.
    pub created_by: UserId,
    /// Initial members, creator included.
    pub member_ids: Vec<UserId>,
    /// When the group was stored.
    pub created_at: DateTime<Utc>,
}
