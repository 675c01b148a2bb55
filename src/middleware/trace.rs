//! Request span construction for `TraceLayer`.
//!
//! Credentials occasionally arrive in query strings (`?token=...`); their
//! values are replaced before the URI is attached to the span.

use axum::http::{Request, Uri};
use tower_http::trace::MakeSpan;
use tracing::Span;

const REDACTED: &str = "[REDACTED]";

/// Query keys whose values never reach the logs (compared case-insensitively)
const SENSITIVE_QUERY_KEYS: &[&str] = &["access_token", "token", "password", "secret"];

#[derive(Clone, Debug, Default)]
pub struct RedactingMakeSpan;

impl<B> MakeSpan<B> for RedactingMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http",
            method = %request.method(),
            uri = %redact_uri(request.uri()),
        )
    }
}

fn redact_uri(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive(key) => format!("{key}={REDACTED}"),
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", uri.path(), pairs.join("&"))
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_QUERY_KEYS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(key))
}
