//! HTTP middleware
//!
//! - Bearer token authentication producing an `Identity`
//! - Request id propagation and request metrics
//! - Redacting trace spans
//! - JSON normalization of framework error responses

pub mod auth;
pub mod error_response;
pub mod metrics;
pub mod trace;

pub use auth::{authenticate, AuthError, Identity};
pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
pub use trace::RedactingMakeSpan;
