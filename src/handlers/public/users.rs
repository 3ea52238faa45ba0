use axum::{
    extract::State,
    http::{header, HeaderName},
    response::IntoResponse,
};

use crate::api::extract::{PathId, ValidJson};
use crate::database::models::Post;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AUTH_COOKIE};
use crate::services::user_service::{LoginUser, RegisterUser};
use crate::services::{PostService, Session, UserService};
use crate::state::AppState;

/// POST /users/register - create an account; responds 201 with `{user, token}`
pub async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterUser>,
) -> Result<impl IntoResponse, ApiError> {
    let session = UserService::new(&state).register(input).await?;
    Ok((session_headers(&state, &session), ApiResponse::created(session)))
}

/// POST /users/login - exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginUser>,
) -> Result<impl IntoResponse, ApiError> {
    let session = UserService::new(&state).login(input).await?;
    Ok((session_headers(&state, &session), ApiResponse::success(session)))
}

/// GET /users/:id/posts
pub async fn posts_by_user(
    State(state): State<AppState>,
    PathId(user_id): PathId,
) -> ApiResult<Vec<Post>> {
    let posts = PostService::new(state.store).list_by_author(user_id).await?;
    Ok(ApiResponse::success(posts))
}

/// GET /users/:id/feed - posts from everyone the user follows
pub async fn feed_of_user(
    State(state): State<AppState>,
    PathId(user_id): PathId,
) -> ApiResult<Vec<Post>> {
    let posts = PostService::new(state.store).feed_of(user_id).await?;
    Ok(ApiResponse::success(posts))
}

/// Token as both a cookie and an `Authorization` header
fn session_headers(state: &AppState, session: &Session) -> [(HeaderName, String); 2] {
    let max_age = state.tokens.validity().num_seconds();
    [
        (
            header::SET_COOKIE,
            format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
                AUTH_COOKIE, session.token, max_age
            ),
        ),
        (header::AUTHORIZATION, format!("Bearer {}", session.token)),
    ]
}
