//! Token codec: mint and verify signed bearer tokens over one shared secret.

use chatty_core::config::AuthConfig;
use chatty_core::result::AppResult;
use chatty_core::types::UserId;
use chatty_entity::user::User;

use super::claims::Claims;
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// Pairs the encoder and decoder built from the same configuration.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenCodec {
    /// Creates a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        }
    }

    /// Mints a token embedding `{ id, email, version }`.
    pub fn mint(&self, id: UserId, email: &str, version: i32) -> AppResult<String> {
        self.encoder.mint(id, email, version)
    }

    /// Mints a token for the identity's current state.
    pub fn mint_for(&self, user: &User) -> AppResult<String> {
        self.mint(user.id, &user.email, user.token_version)
    }

    /// Verifies a token. Fails with `InvalidToken`.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        self.decoder.verify(token)
    }
}
