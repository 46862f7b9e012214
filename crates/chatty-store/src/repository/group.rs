//! Group and membership store trait.

use std::collections::HashSet;

use async_trait::async_trait;

use chatty_core::result::AppResult;
use chatty_core::types::{GroupId, UserId};
use chatty_entity::group::{Group, NewGroup};

/// Persistence for groups and the membership relation.
#[async_trait]
pub trait GroupRepository: Send + Sync + 'static {
    /// Find a group by primary key.
    async fn find_by_id(&self, id: GroupId) -> AppResult<Option<Group>>;

    /// Find a group restricted to rows where `user_id` is a member.
    ///
    /// `None` covers both a missing group and a non-member caller.
    async fn find_for_member(&self, id: GroupId, user_id: UserId) -> AppResult<Option<Group>>;

    /// Returns whether `user_id` is a current member of the group.
    async fn is_member(&self, id: GroupId, user_id: UserId) -> AppResult<bool>;

    /// List the member ids of a group, ascending.
    async fn member_ids(&self, id: GroupId) -> AppResult<Vec<UserId>>;

    /// List the groups an identity belongs to.
    async fn groups_for_user(&self, user_id: UserId) -> AppResult<Vec<Group>>;

    /// Ids of the groups an identity belongs to.
    async fn group_ids_for_user(&self, user_id: UserId) -> AppResult<HashSet<GroupId>>;

    /// Create a group with its initial members.
    async fn create(&self, new_group: NewGroup) -> AppResult<Group>;

    /// Rename a group. Returns `None` if it does not exist.
    async fn rename(&self, id: GroupId, name: &str) -> AppResult<Option<Group>>;

    /// Remove a member. Returns the number of members left.
    async fn remove_member(&self, id: GroupId, user_id: UserId) -> AppResult<usize>;

    /// Delete a group and its memberships. Returns `true` if deleted.
    async fn delete(&self, id: GroupId) -> AppResult<bool>;
}
