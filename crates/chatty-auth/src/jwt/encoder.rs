//! JWT token creation with configurable TTL.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use chatty_core::config::AuthConfig;
use chatty_core::error::AppError;
use chatty_core::types::UserId;

use super::claims::Claims;

/// Creates signed JWT bearer tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token lifetime in minutes. `None` omits the `exp` claim.
    ttl_minutes: Option<u64>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").field("ttl_minutes", &self.ttl_minutes).finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: config.token_ttl_minutes,
        }
    }

    /// Mints a token for the given identity snapshot.
    pub fn mint(&self, id: UserId, email: &str, version: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = match self.ttl_minutes {
            Some(minutes) => Some(
                i64::try_from(minutes)
                    .ok()
                    .and_then(Duration::try_minutes)
                    .and_then(|ttl| now.checked_add_signed(ttl))
                    .ok_or_else(|| {
                        AppError::internal(format!("Token lifetime of {minutes} minutes is out of range"))
                    })?
                    .timestamp(),
            ),
            None => None,
        };
        let claims = Claims {
            id,
            email: email.to_string(),
            version,
            iat: now.timestamp(),
            exp,
        };
        self.encode_claims(&claims)
    }

    /// Signs an arbitrary claims payload.
    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
