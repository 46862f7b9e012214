//! Application builder: wires state, router, and listener.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use chatty_auth::{AuthContextBuilder, PasswordHasher, PasswordValidator, TokenCodec};
use chatty_core::config::AppConfig;
use chatty_core::error::AppError;
use chatty_core::events::ChatEvent;
use chatty_core::traits::EventPublisher;
use chatty_realtime::{ConnectionAuthenticator, ConnectionManager, EventBus, SubscriptionAuthorizer};
use chatty_service::{AuthService, GroupLogic, MessageLogic, UserLogic};
use chatty_store::repository::{GroupRepository, MessageRepository, UserRepository};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the application state over the given stores.
pub fn build_state(
    config: AppConfig,
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    messages: Arc<dyn MessageRepository>,
) -> AppState {
    // ── Auth ─────────────────────────────────────────────────────
    let codec = Arc::new(TokenCodec::new(&config.auth));
    let hasher = Arc::new(PasswordHasher::new());
    let validator = Arc::new(PasswordValidator::new(&config.auth));
    let auth_builder = AuthContextBuilder::new(codec.clone(), users.clone());

    // ── Event bus ────────────────────────────────────────────────
    let bus = EventBus::<ChatEvent>::new(config.realtime.channel_buffer_size);
    let publisher: Arc<dyn EventPublisher> = Arc::new(bus.clone());

    // ── Logic ────────────────────────────────────────────────────
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        codec.clone(),
        hasher,
        validator,
    ));
    let user_logic = Arc::new(UserLogic::new(
        users.clone(),
        groups.clone(),
        messages.clone(),
        codec,
    ));
    let group_logic = Arc::new(GroupLogic::new(
        users.clone(),
        groups.clone(),
        messages.clone(),
        publisher.clone(),
    ));
    let message_logic = Arc::new(MessageLogic::new(users, groups.clone(), messages, publisher));

    // ── Realtime ─────────────────────────────────────────────────
    let authorizer = SubscriptionAuthorizer::new(groups, bus.clone());
    let connections = Arc::new(ConnectionManager::new(config.realtime.clone(), authorizer));

    AppState {
        config: Arc::new(config),
        ws_authenticator: ConnectionAuthenticator::new(auth_builder.clone()),
        auth_builder,
        auth_service,
        user_logic,
        group_logic,
        message_logic,
        bus,
        connections,
    }
}

/// Builds the complete Axum application with all routes and layers.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server);
    build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serves the application on `listener` until `shutdown` resolves.
pub async fn serve<F>(state: AppState, listener: TcpListener, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::internal(format!("Listener has no address: {e}")))?;
    tracing::info!(address = %addr, "Chatty server listening");

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
