//! The per-request / per-connection authentication context.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use chatty_core::error::AppError;
use chatty_core::result::AppResult;
use chatty_entity::user::User;
use chatty_store::repository::UserRepository;

use crate::jwt::Claims;

/// Capability object describing the caller.
///
/// Built once per HTTP request or streaming connection and passed by
/// reference. The identity is looked up lazily on first access and the
/// result, including "nobody", is memoized for the lifetime of the
/// context, so every check in one request sees the same identity.
pub struct AuthContext {
    /// Verified claims awaiting a store lookup, if a token was presented.
    claims: Option<Claims>,
    /// Credential store used for the deferred lookup.
    users: Option<Arc<dyn UserRepository>>,
    /// Memoized resolution.
    identity: OnceCell<Option<Arc<User>>>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("claims", &self.claims)
            .field("identity", &self.identity.get())
            .finish()
    }
}

impl AuthContext {
    /// A context with no caller.
    pub fn anonymous() -> Self {
        Self {
            claims: None,
            users: None,
            identity: OnceCell::new_with(Some(None)),
        }
    }

    /// A context whose identity is looked up on first access.
    pub fn deferred(claims: Claims, users: Arc<dyn UserRepository>) -> Self {
        Self {
            claims: Some(claims),
            users: Some(users),
            identity: OnceCell::new(),
        }
    }

    /// A context for an identity that has already been resolved.
    pub fn resolved(user: Arc<User>, claims: Claims) -> Self {
        Self {
            claims: Some(claims),
            users: None,
            identity: OnceCell::new_with(Some(Some(user))),
        }
    }

    /// The verified token claims, if a valid token was presented.
    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    /// Returns the caller, or `None` for anonymous access.
    ///
    /// A stale token version, a deleted identity, and a failing store all
    /// resolve to `None`.
    pub async fn identity(&self) -> Option<Arc<User>> {
        self.identity.get_or_init(|| self.resolve()).await.clone()
    }

    /// Returns the caller or fails with `Unauthorized`.
    pub async fn require_identity(&self) -> AppResult<Arc<User>> {
        self.identity().await.ok_or_else(AppError::unauthorized)
    }

    async fn resolve(&self) -> Option<Arc<User>> {
        let (Some(claims), Some(users)) = (&self.claims, &self.users) else {
            return None;
        };

        match users.find_by_id_and_version(claims.id, claims.version).await {
            Ok(Some(user)) => Some(Arc::new(user)),
            Ok(None) => {
                debug!(
                    user_id = %claims.id,
                    version = claims.version,
                    "Token does not match a current identity"
                );
                None
            }
            Err(e) => {
                warn!(user_id = %claims.id, error = %e, "Identity lookup failed");
                None
            }
        }
    }
}
