pub mod password;
pub mod token;

pub use password::PasswordHasher;
pub use token::{Claims, TokenKeys};

/// Authenticated caller resolved from a validated token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub user_id: i64,
}

impl Subject {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    /// Whether the caller owns a resource belonging to `owner_id`
    pub fn owns(&self, owner_id: i64) -> bool {
        self.user_id == owner_id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token subject: {0}")]
    InvalidSubject(String),

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AuthError {
    /// Failures caused by the caller's credentials rather than by the server
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::Token(_) | AuthError::InvalidSubject(_) | AuthError::MissingToken
        )
    }
}
