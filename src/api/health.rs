//! Health check endpoint

use crate::api::StatusResponse;
use crate::error::{AppError, Result};
use crate::state::{DbHealth, HasServices};
use axum::Json;
use std::time::Duration;

/// Upper bound on the database probe
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /health
pub async fn health<S: HasServices>(state: &S) -> Result<Json<StatusResponse>> {
    let db = tokio::time::timeout(HEALTH_PROBE_TIMEOUT, state.check_db())
        .await
        .unwrap_or(DbHealth::Down);

    match db {
        DbHealth::Up => Ok(Json(StatusResponse::ok())),
        DbHealth::Down => Err(AppError::Unavailable("db_down".to_string())),
        DbHealth::QueryFailed => Err(AppError::Unavailable("db_query_failed".to_string())),
    }
}
