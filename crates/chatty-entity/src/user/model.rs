//! Identity entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatty_core::types::UserId;

/// Token version assigned to a freshly created identity.
pub const INITIAL_TOKEN_VERSION: i32 = 1;

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identity identifier.
    pub id: UserId,
    /// Unique email address used to log in.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Incremented on every password change. Tokens embedding an older
    /// value no longer resolve.
    pub token_version: i32,
    /// When the identity was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns the fields anyone may see.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// The projection of an identity that is visible to other identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// Identity identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
}

/// Data required to create a new identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
}
