//! Route definitions for the Chatty HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(group_routes())
        .merge(health_routes())
        .route("/ws", get(handlers::ws::ws_upgrade));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Auth endpoints: signup, login, password change
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/password", put(handlers::auth::change_password))
}

/// The caller's own identity
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::me))
        .route("/users/me/friends", get(handlers::user::friends))
        .route("/users/me/groups", get(handlers::user::groups))
}

/// Groups and their messages
fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/groups", post(handlers::group::create_group))
        .route(
            "/groups/{id}",
            get(handlers::group::get_group)
                .put(handlers::group::update_group)
                .delete(handlers::group::delete_group),
        )
        .route("/groups/{id}/leave", post(handlers::group::leave_group))
        .route("/groups/{id}/users", get(handlers::group::group_users))
        .route(
            "/groups/{id}/messages",
            get(handlers::message::list_messages).post(handlers::message::create_message),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
