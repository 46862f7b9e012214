//! Authentication contexts: who is calling, resolved at most once per
//! request or streaming connection.

pub mod builder;
pub mod identity;

pub use builder::{AuthContextBuilder, ConnectionParams, bearer_token};
pub use identity::AuthContext;
