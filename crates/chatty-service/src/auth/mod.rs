//! Entry points that produce authentication state.

pub mod service;

pub use service::{AuthPayload, AuthService, SignupInput};
