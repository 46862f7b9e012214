//! In-memory credential store.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use chatty_core::error::AppError;
use chatty_core::result::AppResult;
use chatty_core::types::UserId;
use chatty_entity::user::model::INITIAL_TOKEN_VERSION;
use chatty_entity::user::{NewUser, User};

use crate::repository::UserRepository;

#[derive(Debug, Default)]
struct UserTables {
    next_id: i64,
    users: BTreeMap<UserId, User>,
    friendships: BTreeMap<UserId, BTreeSet<UserId>>,
}

/// Identity repository backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    tables: RwLock<UserTables>,
}

impl MemoryUserRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id_and_version(&self, id: UserId, version: i32) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .get(&id)
            .filter(|u| u.token_version == version)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AppError::email_taken());
        }

        tables.next_id += 1;
        let user = User {
            id: UserId(tables.next_id),
            email: new_user.email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            token_version: INITIAL_TOKEN_VERSION,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        debug!(user_id = %user.id, "Stored new identity");
        Ok(user)
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.password_hash = password_hash.to_string();
            user.token_version += 1;
            user.clone()
        }))
    }

    async fn friends(&self, id: UserId) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .friendships
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|f| tables.users.get(f).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add_friendship(&self, a: UserId, b: UserId) -> AppResult<()> {
        if a == b {
            return Err(AppError::validation("An identity cannot befriend itself"));
        }
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&a) || !tables.users.contains_key(&b) {
            return Err(AppError::not_found("Identity not found"));
        }
        tables.friendships.entry(a).or_default().insert(b);
        tables.friendships.entry(b).or_default().insert(a);
        Ok(())
    }
}
