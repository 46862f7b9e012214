//! In-memory message store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use chatty_core::result::AppResult;
use chatty_core::types::{GroupId, MessageId, UserId};
use chatty_entity::message::{Message, NewMessage};

use crate::repository::MessageRepository;

#[derive(Debug, Default)]
struct MessageTables {
    next_id: i64,
    messages: BTreeMap<MessageId, Message>,
}

/// Message repository backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryMessageRepository {
    tables: RwLock<MessageTables>,
}

impl MemoryMessageRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first<F>(&self, keep: F) -> Vec<Message>
    where
        F: Fn(&Message) -> bool,
    {
        self.tables
            .read()
            .await
            .messages
            .values()
            .rev()
            .filter(|m| keep(m))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn create(&self, new_message: NewMessage) -> AppResult<Message> {
        let mut tables = self.tables.write().await;
        tables.next_id += 1;
        let message = Message {
            id: MessageId(tables.next_id),
            group_id: new_message.group_id,
            user_id: new_message.user_id,
            text: new_message.text,
            created_at: Utc::now(),
        };
        tables.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, id: MessageId) -> AppResult<Option<Message>> {
        Ok(self.tables.read().await.messages.get(&id).cloned())
    }

    async fn for_group(&self, group_id: GroupId) -> AppResult<Vec<Message>> {
        Ok(self.newest_first(|m| m.group_id == group_id).await)
    }

    async fn for_user(&self, user_id: UserId) -> AppResult<Vec<Message>> {
        Ok(self.newest_first(|m| m.user_id == user_id).await)
    }

    async fn delete_for_group(&self, group_id: GroupId) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.messages.len();
        tables.messages.retain(|_, m| m.group_id != group_id);
        Ok((before - tables.messages.len()) as u64)
    }
}
