//! Auth handlers: signup, login, password change.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use chatty_service::{AuthPayload, SignupInput};

use crate::dto::request::{ChangePasswordRequest, LoginRequest, SignupRequest};
use crate::dto::response::{ApiResponse, AuthResponse, ProfileResponse};
use crate::error::ApiResult;
use crate::extractors::Auth;
use crate::state::AppState;

fn auth_response(payload: AuthPayload) -> ApiResponse<AuthResponse> {
    let email = payload.user.email.clone();
    ApiResponse::ok(AuthResponse {
        token: payload.token,
        user: ProfileResponse::new(&payload.user, email),
    })
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    req.validate()?;

    let payload = state
        .auth_service
        .signup(SignupInput {
            email: req.email,
            password: req.password,
            username: req.username,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(auth_response(payload))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    req.validate()?;
    let payload = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(auth_response(payload)))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: Auth,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    req.validate()?;
    let payload = state
        .auth_service
        .change_password(&auth, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(auth_response(payload)))
}
