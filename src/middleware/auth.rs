//! Bearer token authentication
//!
//! `authenticate` turns the `Authorization` header into an [`Identity`].
//! Handlers for private routes take the identity by value, so they cannot be
//! reached without it.

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::ErrorResponse;
use crate::jwt::JwtManager;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: String,
}

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Header absent, not UTF-8, or not using the `Bearer ` scheme
    #[error("Missing bearer token")]
    MissingToken,
    /// Signature, algorithm, structure or expiry check failed
    #[error("Invalid token")]
    InvalidToken,
    /// `sub` is absent, non-numeric or not positive
    #[error("Invalid token subject")]
    InvalidSubject,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_bearer_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::InvalidSubject => "invalid_token_subject",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.code(), self.to_string()));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extract the raw token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    auth_header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(AuthError::MissingToken)
}

/// Verify the bearer token in `headers` and return the caller's identity
pub fn authenticate(headers: &HeaderMap, jwt_manager: &JwtManager) -> Result<Identity, AuthError> {
    let token = extract_bearer_token(headers)?;

    let claims = jwt_manager.verify_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        AuthError::InvalidToken
    })?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(AuthError::InvalidSubject)?;

    Ok(Identity {
        user_id,
        role: claims.role,
    })
}
