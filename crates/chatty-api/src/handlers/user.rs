//! Handlers for the caller's own identity.

use axum::Json;
use axum::extract::State;

use chatty_entity::group::Group;
use chatty_entity::user::PublicUser;

use crate::dto::response::{ApiResponse, ProfileResponse};
use crate::error::ApiResult;
use crate::extractors::Auth;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: Auth,
) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let me = state.user_logic.me(&auth).await?;
    let email = state.user_logic.email(&me, &auth).await?;
    Ok(Json(ApiResponse::ok(ProfileResponse::new(&me, email))))
}

/// GET /api/users/me/friends
pub async fn friends(
    State(state): State<AppState>,
    auth: Auth,
) -> ApiResult<Json<ApiResponse<Vec<PublicUser>>>> {
    let me = state.user_logic.me(&auth).await?;
    let friends = state.user_logic.friends(&me, &auth).await?;
    Ok(Json(ApiResponse::ok(
        friends.iter().map(|f| f.public()).collect(),
    )))
}

/// GET /api/users/me/groups
pub async fn groups(
    State(state): State<AppState>,
    auth: Auth,
) -> ApiResult<Json<ApiResponse<Vec<Group>>>> {
    let me = state.user_logic.me(&auth).await?;
    let groups = state.user_logic.groups(&me, &auth).await?;
    Ok(Json(ApiResponse::ok(groups)))
}
