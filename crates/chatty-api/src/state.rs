//! Application state shared across all handlers.

use std::sync::Arc;

use chatty_auth::AuthContextBuilder;
use chatty_core::config::AppConfig;
use chatty_core::events::ChatEvent;
use chatty_realtime::{ConnectionAuthenticator, ConnectionManager, EventBus};
use chatty_service::{AuthService, GroupLogic, MessageLogic, UserLogic};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Builds one authentication context per request
    pub auth_builder: AuthContextBuilder,
    /// Authenticates streaming connections from `connection_init`
    pub ws_authenticator: ConnectionAuthenticator,

    // ── Logic ────────────────────────────────────────────────
    /// Login, signup, password change
    pub auth_service: Arc<AuthService>,
    /// Identity queries and fields
    pub user_logic: Arc<UserLogic>,
    /// Group queries, fields, and mutations
    pub group_logic: Arc<GroupLogic>,
    /// Message creation and fields
    pub message_logic: Arc<MessageLogic>,

    // ── Realtime ─────────────────────────────────────────────
    /// In-process event bus
    pub bus: EventBus<ChatEvent>,
    /// Live streaming connections
    pub connections: Arc<ConnectionManager>,
}
