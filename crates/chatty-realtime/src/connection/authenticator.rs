//! Connection authentication from the `connection_init` frame.

use tracing::warn;

use chatty_auth::{AuthContext, AuthContextBuilder};
use chatty_core::error::AppError;
use chatty_core::result::AppResult;

use crate::protocol::InboundMessage;

/// Authenticates streaming connections.
#[derive(Debug, Clone)]
pub struct ConnectionAuthenticator {
    builder: AuthContextBuilder,
}

impl ConnectionAuthenticator {
    /// Creates a new connection authenticator.
    pub fn new(builder: AuthContextBuilder) -> Self {
        Self { builder }
    }

    /// Authenticates a connection from its first text frame.
    ///
    /// Anything other than a `connection_init` carrying a token that
    /// resolves to a current identity is refused.
    pub async fn authenticate(&self, first_frame: &str) -> AppResult<AuthContext> {
        match serde_json::from_str::<InboundMessage>(first_frame) {
            Ok(InboundMessage::ConnectionInit { payload }) => {
                self.builder.for_connection(&payload).await
            }
            Ok(_) => {
                warn!("Streaming connection refused: first frame is not connection_init");
                Err(AppError::unauthorized())
            }
            Err(e) => {
                warn!(error = %e, "Streaming connection refused: unreadable first frame");
                Err(AppError::unauthorized())
            }
        }
    }
}
