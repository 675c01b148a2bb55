//! Registration, login and profile handlers

use crate::api::decode_json;
use crate::domain::UserProfile;
use crate::error::{AppError, Result};
use crate::middleware::Identity;
use crate::state::HasServices;
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// POST /v1/auth/register
pub async fn register<S: HasServices>(
    state: &S,
    body: &[u8],
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let req: CredentialsRequest = decode_json(body)?;
    let id = state
        .auth_service()
        .register(&req.email, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { id })))
}

/// POST /v1/auth/login
pub async fn login<S: HasServices>(state: &S, body: &[u8]) -> Result<Json<LoginResponse>> {
    let req: CredentialsRequest = decode_json(body)?;

    let token = state
        .auth_service()
        .login(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            AppError::InvalidCredentials => e,
            other => {
                tracing::error!(error = %other, "Login failed");
                AppError::Unauthorized("server_error".to_string())
            }
        })?;

    Ok(Json(LoginResponse {
        access_token: token.access_token,
        token_type: "Bearer".to_string(),
        expires_in: token.expires_in,
    }))
}

/// GET /v1/me
pub async fn me<S: HasServices>(state: &S, identity: Identity) -> Result<Json<UserProfile>> {
    let profile = state.auth_service().profile(identity.user_id).await?;
    Ok(Json(profile))
}
