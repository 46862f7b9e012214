//! Message handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use chatty_core::types::{Connection, ConnectionArgs, GroupId};
use chatty_entity::message::Message;
use chatty_service::CreateMessageInput;

use crate::dto::request::CreateMessageRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::Auth;
use crate::state::AppState;

/// GET /api/groups/{id}/messages?first=&after=&last=&before=
pub async fn list_messages(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<GroupId>,
    Query(args): Query<ConnectionArgs>,
) -> ApiResult<Json<ApiResponse<Connection<Message>>>> {
    let group = state.group_logic.query(&auth, id).await?;
    let page = state.group_logic.messages(&group, &args, &auth).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/groups/{id}/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: Auth,
    Path(id): Path<GroupId>,
    Json(req): Json<CreateMessageRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Message>>)> {
    req.validate()?;
    let message = state
        .message_logic
        .create(
            &auth,
            CreateMessageInput {
                group_id: id,
                text: req.text,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}
