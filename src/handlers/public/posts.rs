use axum::extract::State;

use crate::api::extract::PathId;
use crate::database::models::{Comment, Post};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CommentService, PostService};
use crate::state::AppState;

/// GET /posts/:id
pub async fn get_post(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Post> {
    let post = PostService::new(state.store).get(id).await?;
    Ok(ApiResponse::success(post))
}

/// GET /posts/:id/comments - oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    PathId(post_id): PathId,
) -> ApiResult<Vec<Comment>> {
    let comments = CommentService::new(state.store).list_for_post(post_id).await?;
    Ok(ApiResponse::success(comments))
}
