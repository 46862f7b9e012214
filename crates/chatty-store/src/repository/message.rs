//! Message store trait.

use async_trait::async_trait;

use chatty_core::result::AppResult;
use chatty_core::types::{GroupId, MessageId, UserId};
use chatty_entity::message::{Message, NewMessage};

/// Persistence for messages.
#[async_trait]
pub trait MessageRepository: Send + Sync + 'static {
    /// Store a new message.
    async fn create(&self, new_message: NewMessage) -> AppResult<Message>;

    /// Find a message by primary key.
    async fn find_by_id(&self, id: MessageId) -> AppResult<Option<Message>>;

    /// Messages of a group, newest first.
    async fn for_group(&self, group_id: GroupId) -> AppResult<Vec<Message>>;

    /// Messages written by an identity, newest first.
    async fn for_user(&self, user_id: UserId) -> AppResult<Vec<Message>>;

    /// Delete every message of a group. Returns how many were removed.
    async fn delete_for_group(&self, group_id: GroupId) -> AppResult<u64>;
}
