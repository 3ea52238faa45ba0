//! Extractors whose rejections use the API error body.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Json, Path, RawPathParams, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Positive numeric `:id` path segment. Anything else is a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;
        parse_id(&raw).map(PathId).ok_or_else(invalid_id)
    }
}

pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Reject a malformed `:id` segment before anything else looks at the request
pub fn check_path_id(params: &RawPathParams) -> Result<(), ApiError> {
    match params.iter().find(|(key, _)| *key == "id") {
        Some((_, raw)) if parse_id(raw).is_none() => Err(invalid_id()),
        _ => Ok(()),
    }
}

fn invalid_id() -> ApiError {
    ApiError::bad_request("Invalid id")
}

/// `Json<T>` whose parse failures become `ApiError::InvalidJson`
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;
        Ok(ValidJson(value))
    }
}
