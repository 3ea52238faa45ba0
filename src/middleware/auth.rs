use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, RawPathParams, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::extract::check_path_id;
use crate::auth::{AuthError, Subject};
use crate::error::{ApiError, UNAUTHORIZED};
use crate::state::AppState;

/// Name of the cookie carrying the token when no header is sent
pub const AUTH_COOKIE: &str = "Authorization";

/// JWT authentication middleware: validates the token and attaches the caller's `Subject`.
/// A malformed `:id` is a 400 even without credentials.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    params: Option<RawPathParams>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(params) = &params {
        check_path_id(params)?;
    }

    let subject = extract_token(request.headers())
        .and_then(|token| state.tokens.validate(&token))
        .map_err(|err| {
            // The client only ever sees a bare 401
            tracing::debug!(error = %err, "Rejected request token");
            ApiError::from(err)
        })?;

    request.extensions_mut().insert(subject);
    Ok(next.run(request).await)
}

/// Bearer token from the `Authorization` header, else from the auth cookie
fn extract_token(headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthError::MissingToken)?;
        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;
        return Ok(token.to_string());
    }

    cookie_token(headers).ok_or(AuthError::MissingToken)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim().trim_start_matches("Bearer ").to_string())
        .filter(|token| !token.is_empty())
}

/// Handlers behind `jwt_auth_middleware` take the caller as an argument
#[async_trait]
impl<S> FromRequestParts<S> for Subject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Subject>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED))
    }
}
