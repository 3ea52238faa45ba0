use axum::extract::State;

use crate::api::extract::{PathId, ValidJson};
use crate::auth::Subject;
use crate::database::models::Comment;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CommentService, ContentInput, LikeService};
use crate::state::AppState;

/// PUT /comments/:id - author only
pub async fn update_comment(
    State(state): State<AppState>,
    subject: Subject,
    PathId(id): PathId,
    ValidJson(input): ValidJson<ContentInput>,
) -> ApiResult<Comment> {
    let comment = CommentService::new(state.store).update(&subject, id, input).await?;
    Ok(ApiResponse::success(comment))
}

/// DELETE /comments/:id - author only
pub async fn delete_comment(
    State(state): State<AppState>,
    subject: Subject,
    PathId(id): PathId,
) -> ApiResult<()> {
    CommentService::new(state.store).delete(&subject, id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /comments/:id/likes
pub async fn like_comment(
    State(state): State<AppState>,
    subject: Subject,
    PathId(comment_id): PathId,
) -> ApiResult<()> {
    LikeService::new(state.store).like_comment(&subject, comment_id).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /comments/:id/likes - only the user who liked
pub async fn unlike_comment(
    State(state): State<AppState>,
    subject: Subject,
    PathId(comment_id): PathId,
) -> ApiResult<()> {
    LikeService::new(state.store).unlike_comment(&subject, comment_id).await?;
    Ok(ApiResponse::no_content())
}
