use axum::extract::State;

use crate::api::extract::PathId;
use crate::auth::Subject;
use crate::database::models::{Post, User};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PostService, SubscriptionService, UserService};
use crate::state::AppState;

/// GET /users/:id - the caller's own profile
pub async fn get_user(
    State(state): State<AppState>,
    subject: Subject,
    PathId(id): PathId,
) -> ApiResult<User> {
    let user = UserService::new(&state).get(&subject, id).await?;
    Ok(ApiResponse::success(user))
}

/// GET /users/feed - posts from everyone the caller follows
pub async fn feed(State(state): State<AppState>, subject: Subject) -> ApiResult<Vec<Post>> {
    let posts = PostService::new(state.store).feed(&subject).await?;
    Ok(ApiResponse::success(posts))
}

/// POST /users/:id/subscriptions - follow `:id`
pub async fn subscribe(
    State(state): State<AppState>,
    subject: Subject,
    PathId(target_id): PathId,
) -> ApiResult<()> {
    SubscriptionService::new(state.store).subscribe(&subject, target_id).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /users/:id/subscriptions
pub async fn unsubscribe(
    State(state): State<AppState>,
    subject: Subject,
    PathId(target_id): PathId,
) -> ApiResult<()> {
    SubscriptionService::new(state.store).unsubscribe(&subject, target_id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /users/:id/subscriptions - who `:id` follows
pub async fn subscriptions(
    State(state): State<AppState>,
    _subject: Subject,
    PathId(user_id): PathId,
) -> ApiResult<Vec<User>> {
    let users = SubscriptionService::new(state.store).list(user_id).await?;
    Ok(ApiResponse::success(users))
}
