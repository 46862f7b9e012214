//! Builds authentication contexts from transport credentials.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use chatty_core::error::AppError;
use chatty_core::result::AppResult;
use chatty_store::repository::UserRepository;

use super::identity::AuthContext;
use crate::jwt::TokenCodec;

/// Expected prefix of the `Authorization` header value.
const BEARER_PREFIX: &str = "Bearer ";

/// Connection-parameters payload sent when a streaming connection opens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionParams {
    /// Bearer token, without the `Bearer ` prefix.
    #[serde(default)]
    pub jwt: Option<String>,
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Produces one [`AuthContext`] per request or streaming connection.
#[derive(Clone)]
pub struct AuthContextBuilder {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserRepository>,
}

impl std::fmt::Debug for AuthContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContextBuilder")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AuthContextBuilder {
    /// Creates a builder over the shared codec and credential store.
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserRepository>) -> Self {
        Self { codec, users }
    }

    /// Builds a request context from an optional `Authorization` header.
    ///
    /// Never fails. A missing, malformed, or invalid token yields an
    /// anonymous context; a valid one yields a context whose identity is
    /// looked up on first use.
    pub fn for_request(&self, authorization: Option<&str>) -> AuthContext {
        let Some(header) = authorization else {
            return AuthContext::anonymous();
        };
        let Some(token) = bearer_token(header) else {
            debug!("Authorization header is not a bearer token, continuing anonymously");
            return AuthContext::anonymous();
        };

        match self.codec.verify(token) {
            Ok(claims) => AuthContext::deferred(claims, self.users.clone()),
            Err(e) => {
                debug!(error = %e, "Bearer token rejected, continuing anonymously");
                AuthContext::anonymous()
            }
        }
    }

    /// Builds a streaming connection context from its connection parameters.
    ///
    /// Resolves the identity eagerly. A missing token, a token failing
    /// verification, or a token that no longer matches a stored identity
    /// refuses the connection.
    pub async fn for_connection(&self, params: &ConnectionParams) -> AppResult<AuthContext> {
        let Some(token) = params.jwt.as_deref().filter(|t| !t.is_empty()) else {
            warn!("Streaming connection refused: no token in connection parameters");
            return Err(AppError::unauthorized());
        };

        let claims = self.codec.verify(token).inspect_err(|e| {
            warn!(error = %e, "Streaming connection refused: invalid token");
        })?;

        let user = self
            .users
            .find_by_id_and_version(claims.id, claims.version)
            .await?
            .ok_or_else(|| {
                warn!(
                    user_id = %claims.id,
                    version = claims.version,
                    "Streaming connection refused: stale or unknown identity"
                );
                AppError::unauthorized()
            })?;

        debug!(user_id = %user.id, "Streaming connection authenticated");
        Ok(AuthContext::resolved(Arc::new(user), claims))
    }
}
