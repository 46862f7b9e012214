//! Group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatty_core::types::{GroupId, UserId};

/// A chat group. Membership is stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    /// Group name.
    pub name: String,
    /// Initial members. Must include the creator.
    pub member_ids: Vec<UserId>,
}
