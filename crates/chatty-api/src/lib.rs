//! # chatty-api
//!
//! HTTP and WebSocket transport boundary for Chatty built on Axum.
//!
//! Every route builds an authentication context from the `Authorization`
//! header and hands it to the authorization logic layer. The WebSocket
//! route authenticates once with its `connection_init` frame.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, serve};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
