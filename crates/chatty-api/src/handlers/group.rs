//! Group handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use chatty_core::types::GroupId;
use chatty_entity::group::Group;
use chatty_entity::user::PublicUser;
use chatty_service::CreateGroupInput;

use crate::dto::request::{CreateGroupRequest, UpdateGroupRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::Auth;
use crate::state::AppState;

/// POST /api/groups
pub async fn create_group(
    State(state): State<AppState>,
    auth: Auth,
    Json(req): Json<CreateGroupRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Group>>)> {
    req.validate()?;
    let group = state
        .group_logic
        .create(
            &auth,
            CreateGroupInput {
                name: req.name,
                user_ids: req.user_ids,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(group))))
}

/// GET /api/groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<GroupId>,
) -> ApiResult<Json<ApiResponse<Group>>> {
    let group = state.group_logic.query(&auth, id).await?;
    Ok(Json(ApiResponse::ok(group)))
}

/// PUT /api/groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<GroupId>,
    Json(req): Json<UpdateGroupRequest>,
) -> ApiResult<Json<ApiResponse<Group>>> {
    req.validate()?;
    let group = state.group_logic.update(&auth, id, &req.name).await?;
    Ok(Json(ApiResponse::ok(group)))
}

/// DELETE /api/groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<GroupId>,
) -> ApiResult<Json<ApiResponse<Group>>> {
    let group = state.group_logic.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(group)))
}

/// POST /api/groups/{id}/leave
pub async fn leave_group(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<GroupId>,
) -> ApiResult<Json<ApiResponse<Group>>> {
    let group = state.group_logic.leave(&auth, id).await?;
    Ok(Json(ApiResponse::ok(group)))
}

/// GET /api/groups/{id}/users
pub async fn group_users(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<GroupId>,
) -> ApiResult<Json<ApiResponse<Vec<PublicUser>>>> {
    let group = state.group_logic.query(&auth, id).await?;
    let users = state.group_logic.users(&group, &auth).await?;
    Ok(Json(ApiResponse::ok(
        users.iter().map(|u| u.public()).collect(),
    )))
}
