use std::collections::HashMap;

use super::ServiceError;

pub const MAX_CONTENT_LENGTH: usize = 5000;
pub const MAX_NAME_LENGTH: usize = 100;

/// Collects per-field problems so a request reports all of them at once
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.0.insert(field.to_string(), message);
        }
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation {
                message: "Invalid input".to_string(),
                field_errors: Some(self.0),
            })
        }
    }
}

/// Basic email shape check: one `@`, non-empty local part, dotted domain
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    let domain = parts[1];
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

pub fn validate_name(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("This field is required".to_string());
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("Must be at most {} characters", MAX_NAME_LENGTH));
    }
    Ok(())
}

pub fn validate_password(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    // bcrypt ignores everything past 72 bytes
    if value.len() > 72 {
        return Err("Password must be at most 72 bytes".to_string());
    }
    Ok(())
}

/// Post and comment bodies: non-blank and bounded. Returns the trimmed text.
pub fn validate_content(content: &str) -> Result<String, ServiceError> {
    let trimmed = content.trim();
    let mut errors = FieldErrors::new();
    if trimmed.is_empty() {
        errors.check("content", Err("Content cannot be empty".to_string()));
    } else if trimmed.chars().count() > MAX_CONTENT_LENGTH {
        errors.check(
            "content",
            Err(format!("Content must be at most {} characters", MAX_CONTENT_LENGTH)),
        );
    }
    errors.into_result()?;
    Ok(trimmed.to_string())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
