use axum::extract::State;

use crate::api::extract::PathId;
use crate::database::models::Comment;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CommentService;
use crate::state::AppState;

/// GET /comments/:id
pub async fn get_comment(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Comment> {
    let comment = CommentService::new(state.store).get(id).await?;
    Ok(ApiResponse::success(comment))
}
