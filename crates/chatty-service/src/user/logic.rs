//! Identity field logic. Everything except `username` is self-access.

use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use chatty_auth::{AuthContext, TokenCodec};
use chatty_core::error::AppError;
use chatty_core::result::AppResult;
use chatty_core::types::UserId;
use chatty_entity::group::Group;
use chatty_entity::message::Message;
use chatty_entity::user::User;
use chatty_store::repository::{GroupRepository, MessageRepository, UserRepository};

use crate::access::require_self;

/// Lookup arguments for a single identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Gates every identity query and field.
#[derive(Clone)]
pub struct UserLogic {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    messages: Arc<dyn MessageRepository>,
    codec: Arc<TokenCodec>,
}

impl UserLogic {
    /// Creates the identity logic.
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        messages: Arc<dyn MessageRepository>,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            users,
            groups,
            messages,
            codec,
        }
    }

    /// The caller itself.
    pub async fn me(&self, ctx: &AuthContext) -> AppResult<Arc<User>> {
        ctx.require_identity().await
    }

    /// Looks up an identity by id or email. Only the caller may be found.
    pub async fn query(&self, ctx: &AuthContext, query: &UserQuery) -> AppResult<Arc<User>> {
        let me = ctx.require_identity().await?;

        let id_matches = query.id == Some(me.id);
        let email_matches = query
            .email
            .as_deref()
            .is_some_and(|email| email.trim().eq_ignore_ascii_case(&me.email));

        if id_matches || email_matches {
            Ok(me)
        } else {
            warn!(user_id = %me.id, "Identity query denied");
            Err(AppError::unauthorized())
        }
    }

    /// Public field.
    pub fn username<'a>(&self, user: &'a User) -> &'a str {
        &user.username
    }

    pub async fn email(&self, user: &User, ctx: &AuthContext) -> AppResult<String> {
        require_self(ctx, user.id).await?;
        Ok(user.email.clone())
    }

    pub async fn friends(&self, user: &User, ctx: &AuthContext) -> AppResult<Vec<User>> {
        require_self(ctx, user.id).await?;
        self.users.friends(user.id).await
    }

    pub async fn groups(&self, user: &User, ctx: &AuthContext) -> AppResult<Vec<Group>> {
        require_self(ctx, user.id).await?;
        self.groups.groups_for_user(user.id).await
    }

    pub async fn messages(&self, user: &User, ctx: &AuthContext) -> AppResult<Vec<Message>> {
        require_self(ctx, user.id).await?;
        self.messages.for_user(user.id).await
    }

    /// A freshly minted token for the caller's current token version.
    pub async fn token(&self, user: &User, ctx: &AuthContext) -> AppResult<String> {
        let me = require_self(ctx, user.id).await?;
        self.codec.mint_for(&me)
    }
}
