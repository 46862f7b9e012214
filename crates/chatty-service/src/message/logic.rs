//! Message logic. Posting and reading are limited to group members.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use chatty_auth::AuthContext;
use chatty_core::error::AppError;
use chatty_core::events::{ChatEvent, MessageCreated};
use chatty_core::result::AppResult;
use chatty_core::traits::EventPublisher;
use chatty_core::types::GroupId;
use chatty_entity::group::Group;
use chatty_entity::message::{Message, NewMessage};
use chatty_entity::user::PublicUser;
use chatty_store::repository::{GroupRepository, MessageRepository, UserRepository};

use crate::access::non_empty;

/// Arguments for posting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessageInput {
    pub group_id: GroupId,
    pub text: String,
}

/// Gates message creation and message fields.
#[derive(Clone)]
pub struct MessageLogic {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    messages: Arc<dyn MessageRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl MessageLogic {
    /// Creates the message logic.
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

    /// Posts a message to a group the caller belongs to and publishes it.
    pub async fn create(&self, ctx: &AuthContext, input: CreateMessageInput) -> AppResult<Message> {
        let me = ctx.require_identity().await?;
        let text = non_empty(&input.text, "Message text")?.to_string();

        if !self.groups.is_member(input.group_id, me.id).await? {
            warn!(group_id = %input.group_id, user_id = %me.id, "Message post denied");
            return Err(AppError::unauthorized());
        }

        let message = self
            .messages
            .create(NewMessage {
                group_id: input.group_id,
                user_id: me.id,
                text,
            })
            .await?;

        let member_ids = self.groups.member_ids(input.group_id).await?;
        info!(
            message_id = %message.id,
            group_id = %message.group_id,
            user_id = %me.id,
            "Message created"
        );

        self.publisher.publish(ChatEvent::MessageCreated(MessageCreated {
            message_id: message.id,
            group_id: message.group_id,
            author_id: message.user_id,
            text: message.text.clone(),
            created_at: message.created_at,
            member_ids,
        }));

        Ok(message)
    }

    /// The author's public fields. Requires an identity.
    pub async fn from(&self, message: &Message, ctx: &AuthContext) -> AppResult<PublicUser> {
        ctx.require_identity().await?;
        self.users
            .find_by_id(message.user_id)
            .await?
            .map(|user| user.public())
            .ok_or_else(|| AppError::not_found("Author not found"))
    }

    /// The group the message was posted to. Members only.
    pub async fn to(&self, message: &Message, ctx: &AuthContext) -> AppResult<Group> {
        let me = ctx.require_identity().await?;
        self.groups
            .find_for_member(message.group_id, me.id)
            .await?
            .ok_or_else(AppError::unauthorized)
    }
}
