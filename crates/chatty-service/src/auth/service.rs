//! Login, signup, and password change.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use chatty_auth::{AuthContext, PasswordHasher, PasswordValidator, TokenCodec};
use chatty_core::error::AppError;
use chatty_core::result::AppResult;
use chatty_entity::user::{NewUser, User};
use chatty_store::repository::UserRepository;

/// Result of a successful login, signup, or password change.
#[derive(Debug, Clone, Serialize)]
pub struct AuthPayload {
    /// The authenticated identity.
    pub user: User,
    /// A bearer token for that identity.
    pub token: String,
}

/// Signup arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    /// Defaults to the email address.
    #[serde(default)]
    pub username: Option<String>,
}

/// Handles the unauthenticated entry points and credential changes.
#[derive(Clone)]
pub struct AuthService {
    /// Credential store.
    users: Arc<dyn UserRepository>,
    /// Token codec.
    codec: Arc<TokenCodec>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    validator: Arc<PasswordValidator>,
    /// Decoy hash checked when the email is unknown, so both login
    /// failures cost one Argon2 verification.
    dummy_hash: Arc<OnceCell<String>>,
}

/// Plaintext behind the decoy hash.
const DUMMY_PASSWORD: &str = "chatty-login-decoy";

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        codec: Arc<TokenCodec>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            users,
            codec,
            hasher,
            validator,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Authenticates by email and password and mints a token.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            let dummy = self.dummy_hash().await?;
            self.hasher.verify_password(password, dummy)?;
            warn!("Login failed: unknown email");
            return Err(AppError::invalid_credentials());
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::invalid_credentials());
        }

        let token = self.codec.mint_for(&user)?;
        info!(user_id = %user.id, "User logged in");
        Ok(AuthPayload { user, token })
    }

    /// Registers a new identity with token version 1 and mints a token.
    pub async fn signup(&self, input: SignupInput) -> AppResult<AuthPayload> {
        let email = normalize_email(&input.email);
        if !is_plausible_email(&email) {
            return Err(AppError::validation("Invalid email format"));
        }
        self.validator.validate(&input.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::email_taken());
        }

        let username = input
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.clone());
        let password_hash = self.hasher.hash_password(&input.password)?;

        let user = self
            .users
            .create(NewUser {
                email,
                username,
                password_hash,
            })
            .await?;

        let token = self.codec.mint_for(&user)?;
        info!(user_id = %user.id, "User signed up");
        Ok(AuthPayload { user, token })
    }

    /// Replaces the caller's password and bumps its token version.
    ///
    /// Every token minted before the change stops resolving; the returned
    /// token carries the new version.
    pub async fn change_password(
        &self,
        ctx: &AuthContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<AuthPayload> {
        let me = ctx.require_identity().await?;

        if !self.hasher.verify_password(current_password, &me.password_hash)? {
            warn!(user_id = %me.id, "Password change failed: wrong current password");
            return Err(AppError::invalid_credentials());
        }

        self.validator.validate(new_password)?;
        self.validator
            .validate_not_same(current_password, new_password)?;

        let new_hash = self.hasher.hash_password(new_password)?;
        let user = self
            .users
            .update_password(me.id, &new_hash)
            .await?
            .ok_or_else(AppError::unauthorized)?;

        let token = self.codec.mint_for(&user)?;
        info!(user_id = %user.id, version = user.token_version, "Password changed");
        Ok(AuthPayload { user, token })
    }

    async fn dummy_hash(&self) -> AppResult<&str> {
        self.dummy_hash
            .get_or_try_init(|| async { self.hasher.hash_password(DUMMY_PASSWORD) })
            .await
            .map(String::as_str)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
