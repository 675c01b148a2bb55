//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Role assigned to newly registered users
pub const DEFAULT_ROLE: &str = "user";

/// Minimum password length in bytes accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            email: String::new(),
            password_hash: String::new(),
            role: DEFAULT_ROLE.to_string(),
            created_at: Utc::now(),
        }
    }
}

// Counted in UTF-8 bytes, not characters
fn validate_password_len(password: &str) -> Result<(), validator::ValidationError> {
    if password.len() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(validator::ValidationError::new("password_min_8"))
    }
}

/// Trim and lowercase an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Credentials submitted to register or log in
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CredentialsInput {
    #[validate(length(min = 1, message = "email_required"))]
    pub email: String,
    #[validate(custom(function = "validate_password_len"))]
    pub password: String,
}

impl CredentialsInput {
    /// Build an input with the email already normalized
    pub fn normalized(email: &str, password: &str) -> Self {
        Self {
            email: normalize_email(email),
            password: password.to_string(),
        }
    }
}

/// Input for inserting a user row
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Public view of a user (`GET /v1/me`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}
