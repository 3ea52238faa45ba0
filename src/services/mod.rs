pub mod comment_service;
pub mod like_service;
pub mod post_service;
pub mod subscription_service;
pub mod user_service;
pub mod validation;

pub use comment_service::CommentService;
pub use like_service::LikeService;
pub use post_service::PostService;
pub use subscription_service::SubscriptionService;
pub use user_service::{Session, UserService};

use std::collections::HashMap;

use crate::auth::AuthError;
use crate::database::DatabaseError;

/// Outcome of a domain operation that did not succeed
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    /// Classify a foreign-key failure from an insert made for the caller. A
    /// dangling caller id means the token outlived its user (401); any other
    /// reference is the target, which vanished after its lookup.
    pub(crate) fn from_reference(err: DatabaseError, missing_target: fn() -> ServiceError) -> Self {
        match err {
            DatabaseError::ForeignKeyViolation(constraint) if references_caller(&constraint) => {
                ServiceError::Unauthorized
            }
            DatabaseError::ForeignKeyViolation(_) => missing_target(),
            other => other.into(),
        }
    }
}

/// Constraints on the acting user's column: `author_id` on posts and
/// comments, `user_id` on likes and subscriptions.
fn references_caller(constraint: &str) -> bool {
    constraint.ends_with("_author_id_fkey") || constraint.ends_with("_user_id_fkey")
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Body for creating or editing a post or comment
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ContentInput {
    pub content: String,
}
