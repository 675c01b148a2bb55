//! REST API handlers and shared request/response helpers

pub mod auth;
pub mod cart;
pub mod health;
pub mod metrics;

use crate::error::{AppError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// `{"status": "ok"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Decode a JSON object request body; anything else is `invalid_json`
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(invalid_json)?;
    if !value.is_object() {
        tracing::debug!("Rejected non-object request body");
        return Err(AppError::BadRequest("invalid_json".to_string()));
    }
    serde_json::from_value(value).map_err(invalid_json)
}

fn invalid_json(e: serde_json::Error) -> AppError {
    tracing::debug!(error = %e, "Rejected request body");
    AppError::BadRequest("invalid_json".to_string())
}

/// Parse a positive item id from a path parameter
pub(crate) fn parse_item_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("invalid_item_id".to_string()))
}
