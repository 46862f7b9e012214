//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use chatty_core::types::UserId;

/// Signup request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Display name. Defaults to the email.
    #[serde(default)]
    pub username: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 1))]
    pub new_password: String,
}

/// Create group request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGroupRequest {
    /// Group name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Friends to add.
    #[serde(default)]
    pub user_ids: Vec<UserId>,
}

/// Rename group request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Post message request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMessageRequest {
    /// Message body.
    #[validate(length(min = 1, max = 4096))]
    pub text: String,
}
