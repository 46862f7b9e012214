//! Authorizes subscription establishment and builds per-event predicates.
//!
//! Establishment checks hit the store once. The predicates installed on
//! the bus are pure matches over the event payload; they never query the
//! store per event.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use chatty_auth::AuthContext;
use chatty_core::error::AppError;
use chatty_core::events::{ChatEvent, Topic};
use chatty_core::result::AppResult;
use chatty_core::types::{GroupId, UserId};
use chatty_store::repository::GroupRepository;

use crate::bus::{EventBus, EventFilter, Subscription};

/// Composes bus subscriptions with authorization.
#[derive(Clone)]
pub struct SubscriptionAuthorizer {
    groups: Arc<dyn GroupRepository>,
    bus: EventBus<ChatEvent>,
}

impl SubscriptionAuthorizer {
    /// Creates an authorizer over the membership store and the bus.
    pub fn new(groups: Arc<dyn GroupRepository>, bus: EventBus<ChatEvent>) -> Self {
        Self { groups, bus }
    }

    /// Subscribes to new messages in `group_ids`.
    ///
    /// Fails with `Unauthorized`, registering nothing, unless the caller is
    /// a member of every requested group.
    pub async fn message_created(
        &self,
        ctx: &AuthContext,
        group_ids: &[GroupId],
    ) -> AppResult<Subscription<ChatEvent>> {
        let me = ctx.require_identity().await?;
        let memberships = self.groups.group_ids_for_user(me.id).await?;

        if let Some(denied) = group_ids.iter().find(|id| !memberships.contains(id)) {
            warn!(
                user_id = %me.id,
                group_id = %denied,
                "Message subscription denied"
            );
            return Err(AppError::unauthorized());
        }

        let requested: HashSet<GroupId> = group_ids.iter().copied().collect();
        info!(user_id = %me.id, groups = requested.len(), "Subscribed to new messages");
        Ok(self
            .bus
            .subscribe(Topic::MessageCreated, message_filter(me.id, requested)))
    }

    /// Subscribes to groups created with `user_id` as a member.
    ///
    /// `user_id` must be the caller's own id.
    pub async fn group_created(
        &self,
        ctx: &AuthContext,
        user_id: UserId,
    ) -> AppResult<Subscription<ChatEvent>> {
        let me = ctx.require_identity().await?;
        if me.id != user_id {
            warn!(user_id = %me.id, target_id = %user_id, "Group subscription denied");
            return Err(AppError::unauthorized());
        }

        info!(user_id = %me.id, "Subscribed to new groups");
        Ok(self
            .bus
            .subscribe(Topic::GroupCreated, group_filter(me.id)))
    }
}

/// Passes messages posted by someone else to a requested group that still
/// counted the subscriber as a member when the message was published.
pub fn message_filter(subscriber: UserId, requested: HashSet<GroupId>) -> EventFilter<ChatEvent> {
    Arc::new(move |event: &ChatEvent| -> AppResult<bool> {
        Ok(match event {
            ChatEvent::MessageCreated(message) => {
                requested.contains(&message.group_id)
                    && message.member_ids.contains(&subscriber)
                    && message.author_id != subscriber
            }
            ChatEvent::GroupCreated(_) => false,
        })
    })
}

/// Passes groups created by someone else that list the subscriber as a member.
pub fn group_filter(subscriber: UserId) -> EventFilter<ChatEvent> {
    Arc::new(move |event: &ChatEvent| -> AppResult<bool> {
        Ok(match event {
            ChatEvent::GroupCreated(group) => {
                group.member_ids.contains(&subscriber) && group.created_by != subscriber
            }
            ChatEvent::MessageCreated(_) => false,
        })
    })
}
