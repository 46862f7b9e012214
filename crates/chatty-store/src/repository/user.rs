//! Credential store trait.

use async_trait::async_trait;

use chatty_core::result::AppResult;
use chatty_core::types::UserId;
use chatty_entity::user::{NewUser, User};

/// Persistence for identities, their credentials, and friendships.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find an identity by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find an identity by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find an identity whose current token version equals `version`.
    ///
    /// A stale version yields `None`, exactly like a missing identity.
    async fn find_by_id_and_version(&self, id: UserId, version: i32) -> AppResult<Option<User>>;

    /// Find all identities among `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>>;

    /// Create an identity with the initial token version.
    ///
    /// Fails with `EmailTaken` if the email already belongs to an identity.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Replace the password hash and increment the token version.
    ///
    /// Returns the updated identity, or `None` if it does not exist.
    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<Option<User>>;

    /// List the friends of an identity.
    async fn friends(&self, id: UserId) -> AppResult<Vec<User>>;

    /// Record a symmetric friendship.
    async fn add_friendship(&self, a: UserId, b: UserId) -> AppResult<()>;
}
