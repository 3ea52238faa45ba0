use axum::extract::State;

use crate::api::extract::{PathId, ValidJson};
use crate::auth::Subject;
use crate::database::models::{Comment, Post};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CommentService, ContentInput, LikeService, PostService};
use crate::state::AppState;

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    subject: Subject,
    ValidJson(input): ValidJson<ContentInput>,
) -> ApiResult<Post> {
    let post = PostService::new(state.store).create(&subject, input).await?;
    Ok(ApiResponse::created(post))
}

/// PUT /posts/:id - author only
pub async fn update_post(
    State(state): State<AppState>,
    subject: Subject,
    PathId(id): PathId,
    ValidJson(input): ValidJson<ContentInput>,
) -> ApiResult<Post> {
    let post = PostService::new(state.store).update(&subject, id, input).await?;
    Ok(ApiResponse::success(post))
}

/// DELETE /posts/:id - author only; takes comments and likes with it
pub async fn delete_post(
    State(state): State<AppState>,
    subject: Subject,
    PathId(id): PathId,
) -> ApiResult<()> {
    PostService::new(state.store).delete(&subject, id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /posts/:id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    subject: Subject,
    PathId(post_id): PathId,
    ValidJson(input): ValidJson<ContentInput>,
) -> ApiResult<Comment> {
    let comment = CommentService::new(state.store).create(&subject, post_id, input).await?;
    Ok(ApiResponse::created(comment))
}

/// POST /posts/:id/likes
pub async fn like_post(
    State(state): State<AppState>,
    subject: Subject,
    PathId(post_id): PathId,
) -> ApiResult<()> {
    LikeService::new(state.store).like_post(&subject, post_id).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /posts/:id/likes
pub async fn unlike_post(
    State(state): State<AppState>,
    subject: Subject,
    PathId(post_id): PathId,
) -> ApiResult<()> {
    LikeService::new(state.store).unlike_post(&subject, post_id).await?;
    Ok(ApiResponse::no_content())
}
