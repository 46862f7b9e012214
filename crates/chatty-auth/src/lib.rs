//! # chatty-auth
//!
//! Authentication for Chatty.
//!
//! ## Modules
//!
//! - `jwt`: signed token minting and verification (the token codec)
//! - `password`: Argon2id password hashing and policy enforcement
//! - `context`: per-request and per-connection authentication contexts

pub mod context;
pub mod jwt;
pub mod password;

pub use context::{AuthContext, AuthContextBuilder, ConnectionParams, bearer_token};
pub use jwt::{Claims, TokenCodec};
pub use password::{PasswordHasher, PasswordValidator};
