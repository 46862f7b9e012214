//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_TTL_MINUTES: u64 = 60 * 24 * 366 * 10;

/// Token signing and credential policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in minutes. `None` mints tokens without an `exp` claim.
    #[serde(default)]
    pub token_ttl_minutes: Option<u64>,
    /// Minimum password length accepted at signup and password change.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: None,
            password_min_length: default_password_min(),
        }
    }
}

impl AuthConfig {
    /// Rejects token lifetimes that cannot be turned into an expiry.
    pub fn validate(&self) -> Result<(), AppError> {
        match self.token_ttl_minutes {
            Some(0) => Err(AppError::configuration(
                "auth.token_ttl_minutes must be at least 1",
            )),
            Some(minutes) if minutes > MAX_TOKEN_TTL_MINUTES => Err(AppError::configuration(
                format!("auth.token_ttl_minutes must not exceed {MAX_TOKEN_TTL_MINUTES}, got {minutes}"),
            )),
            _ => Ok(()),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_password_min() -> usize {
    1
}
