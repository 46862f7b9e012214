//! JWT claims structure embedded in every bearer token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatty_core::types::UserId;

/// JWT claims payload.
///
/// The wire shape is `{ id, email, version, iat, exp? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity the token was minted for.
    pub id: UserId,
    /// Email of the identity at mint time.
    pub email: String,
    /// Token version of the identity at mint time.
    pub version: i32,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch), if the token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`, if any.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}
