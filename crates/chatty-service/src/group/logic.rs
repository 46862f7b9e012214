//! Group logic.
//!
//! Reads and mutations are limited to current members. Update, leave, and
//! delete go through a lookup restricted to groups the caller belongs to,
//! so a missing group and a foreign group both fail with `Unauthorized`.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use chatty_auth::AuthContext;
use chatty_core::error::AppError;
use chatty_core::events::{ChatEvent, GroupCreated};
use chatty_core::result::AppResult;
use chatty_core::traits::EventPublisher;
use chatty_core::types::{Connection, ConnectionArgs, GroupId, UserId};
use chatty_entity::group::{Group, NewGroup};
use chatty_entity::message::Message;
use chatty_entity::user::User;
use chatty_store::repository::{GroupRepository, MessageRepository, UserRepository};

use crate::access::non_empty;

/// Arguments for creating a group.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupInput {
    pub name: String,
    /// Friends to add. Ids that are not friends of the creator are ignored.
    #[serde(default)]
    pub user_ids: Vec<UserId>,
}

/// Gates every group query, field, and mutation.
#[derive(Clone)]
pub struct GroupLogic {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    messages: Arc<dyn MessageRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl GroupLogic {
    /// Creates the group logic.
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        messages: Arc<dyn MessageRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            users,
            groups,
            messages,
            publisher,
        }
    }

    /// Finds a group the caller belongs to.
    pub async fn query(&self, ctx: &AuthContext, group_id: GroupId) -> AppResult<Group> {
        let me = ctx.require_identity().await?;
        self.member_group(group_id, &me).await
    }

    /// Members of the group.
    pub async fn users(&self, group: &Group, ctx: &AuthContext) -> AppResult<Vec<User>> {
        self.require_member(group.id, ctx).await?;
        let ids = self.groups.member_ids(group.id).await?;
        self.users.find_by_ids(&ids).await
    }

    /// One page of the group's messages, newest first.
    pub async fn messages(
        &self,
        group: &Group,
        args: &ConnectionArgs,
        ctx: &AuthContext,
    ) -> AppResult<Connection<Message>> {
        self.require_member(group.id, ctx).await?;
        let messages = self.messages.for_group(group.id).await?;
        Connection::paginate(messages, args, |m| m.id.get())
    }

    /// Creates a group with the caller and the listed friends as members.
    pub async fn create(&self, ctx: &AuthContext, input: CreateGroupInput) -> AppResult<Group> {
        let me = ctx.require_identity().await?;
        let name = non_empty(&input.name, "Group name")?.to_string();

        let friends = self.users.friends(me.id).await?;
        let mut member_ids = vec![me.id];
        for id in input.user_ids {
            if friends.iter().any(|f| f.id == id) && !member_ids.contains(&id) {
                member_ids.push(id);
            }
        }

        let group = self
            .groups
            .create(NewGroup {
                name,
                member_ids: member_ids.clone(),
            })
            .await?;

        info!(
            group_id = %group.id,
            user_id = %me.id,
            members = member_ids.len(),
            "Group created"
        );

        self.publisher.publish(ChatEvent::GroupCreated(GroupCreated {
            group_id: group.id,
            name: group.name.clone(),
            created_by: me.id,
            member_ids,
            created_at: group.created_at,
        }));

        Ok(group)
    }

    /// Renames a group the caller belongs to.
    pub async fn update(&self, ctx: &AuthContext, group_id: GroupId, name: &str) -> AppResult<Group> {
        let me = ctx.require_identity().await?;
        let name = non_empty(name, "Group name")?;
        self.member_group(group_id, &me).await?;

        let group = self
            .groups
            .rename(group_id, name)
            .await?
            .ok_or_else(AppError::unauthorized)?;

        info!(group_id = %group_id, user_id = %me.id, "Group renamed");
        Ok(group)
    }

    /// Removes the caller from a group. The last member out deletes it.
    pub async fn leave(&self, ctx: &AuthContext, group_id: GroupId) -> AppResult<Group> {
        let me = ctx.require_identity().await?;
        let group = self.member_group(group_id, &me).await?;

        let remaining = self.groups.remove_member(group_id, me.id).await?;
        info!(group_id = %group_id, user_id = %me.id, remaining, "Left group");

        if remaining == 0 {
            self.purge(group_id).await?;
        }
        Ok(group)
    }

    /// Deletes a group the caller belongs to, with its messages.
    pub async fn delete(&self, ctx: &AuthContext, group_id: GroupId) -> AppResult<Group> {
        let me = ctx.require_identity().await?;
        let group = self.member_group(group_id, &me).await?;
        self.purge(group_id).await?;
        info!(group_id = %group_id, user_id = %me.id, "Group deleted");
        Ok(group)
    }

    async fn purge(&self, group_id: GroupId) -> AppResult<()> {
        let removed = self.messages.delete_for_group(group_id).await?;
        self.groups.delete(group_id).await?;
        info!(group_id = %group_id, messages = removed, "Group purged");
        Ok(())
    }

    /// Join-style lookup: the group, but only if `me` is a member.
    async fn member_group(&self, group_id: GroupId, me: &User) -> AppResult<Group> {
        self.groups
            .find_for_member(group_id, me.id)
            .await?
            .ok_or_else(|| {
                warn!(group_id = %group_id, user_id = %me.id, "Group access denied");
                AppError::unauthorized()
            })
    }

    async fn require_member(&self, group_id: GroupId, ctx: &AuthContext) -> AppResult<()> {
        let me = ctx.require_identity().await?;
        if !self.groups.is_member(group_id, me.id).await? {
            warn!(group_id = %group_id, user_id = %me.id, "Group access denied");
            return Err(AppError::unauthorized());
        }
        Ok(())
    }
}
