use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::validation::{normalize_email, validate_email_format, validate_name, validate_password, FieldErrors};
use super::{ServiceError, ServiceResult};
use crate::auth::{PasswordHasher, Subject, TokenKeys};
use crate::database::models::{NewUser, User};
use crate::database::{DatabaseError, Store};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A user together with a freshly issued access token
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub struct UserService {
    store: Arc<dyn Store>,
    passwords: PasswordHasher,
    tokens: Arc<TokenKeys>,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            passwords: state.passwords,
            tokens: state.tokens.clone(),
        }
    }

    /// Create an account and sign the new user in
    pub async fn register(&self, input: RegisterUser) -> ServiceResult<Session> {
        let email = normalize_email(&input.email);

        let mut errors = FieldErrors::new();
        errors.check("email", validate_email_format(&email));
        errors.check("firstName", validate_name(&input.first_name));
        errors.check("lastName", validate_name(&input.last_name));
        errors.check("password", validate_password(&input.password));
        errors.into_result()?;

        let password_hash = self.passwords.hash(&input.password).await?;

        let new_user = NewUser {
            email,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            password_hash,
        };

        let user = match self.store.create_user(new_user).await {
            Ok(user) => user,
            Err(DatabaseError::UniqueViolation(_)) => return Err(email_taken()),
            Err(err) => return Err(err.into()),
        };

        let token = self.tokens.issue(user.id)?;
        info!(user_id = user.id, "Registered user");
        Ok(Session { user, token })
    }

    /// Exchange credentials for a token. Unknown email and wrong password look the same.
    pub async fn login(&self, input: LoginUser) -> ServiceResult<Session> {
        let email = normalize_email(&input.email);
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        if !self.passwords.verify(&input.password, &user.password).await? {
            return Err(ServiceError::Unauthorized);
        }

        let token = self.tokens.issue(user.id)?;
        info!(user_id = user.id, "User logged in");
        Ok(Session { user, token })
    }

    /// Profile lookup; callers may only read their own profile
    pub async fn get(&self, subject: &Subject, id: i64) -> ServiceResult<User> {
        if !subject.owns(id) {
            return Err(ServiceError::forbidden("You can only view your own profile"));
        }
        self.require(id).await
    }

    pub async fn require(&self, id: i64) -> ServiceResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))
    }
}

fn email_taken() -> ServiceError {
    let mut field_errors = HashMap::new();
    field_errors.insert("email".to_string(), "Email is already registered".to_string());
    ServiceError::Validation {
        message: "Email is already registered".to_string(),
        field_errors: Some(field_errors),
    }
}
