//! Shared identity predicates.

use std::sync::Arc;

use tracing::warn;

use chatty_auth::AuthContext;
use chatty_core::error::AppError;
use chatty_core::result::AppResult;
use chatty_core::types::UserId;
use chatty_entity::user::User;

/// Resolves the caller and requires it to be `target`.
///
/// Used by every self-access field.
pub async fn require_self(ctx: &AuthContext, target: UserId) -> AppResult<Arc<User>> {
    let me = ctx.require_identity().await?;
    if me.id != target {
        warn!(user_id = %me.id, target_id = %target, "Self-access denied");
        return Err(AppError::unauthorized());
    }
    Ok(me)
}

/// Trims `value` and rejects it if nothing is left.
pub fn non_empty<'a>(value: &'a str, field: &str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}
