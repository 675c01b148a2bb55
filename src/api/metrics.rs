//! Prometheus /metrics endpoint

use crate::error::{AppError, Result};
use crate::state::HasServices;

/// GET /metrics: Prometheus text exposition format
pub async fn metrics<S: HasServices>(state: &S) -> Result<String> {
    state
        .prometheus_handle()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::NotFound("not_found".to_string()))
}
