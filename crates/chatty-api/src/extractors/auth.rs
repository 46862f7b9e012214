//! `Auth` extractor: builds the request's authentication context from the
//! `Authorization` header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use chatty_auth::AuthContext;

use crate::state::AppState;

/// The caller's authentication context.
///
/// Never rejects: a missing or invalid bearer token yields an anonymous
/// context, and the logic layer decides whether that is enough.
#[derive(Debug)]
pub struct Auth(pub AuthContext);

impl std::ops::Deref for Auth {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Auth {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        Ok(Auth(state.auth_builder.for_request(header)))
    }
}
