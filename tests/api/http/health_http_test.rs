//! Health, metrics and fallback tests

use super::{build_test_router, get, send, TestAppState};
use axum::http::{Method, StatusCode};
use cartkeeper::state::DbHealth;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_ok() {
    let app = build_test_router(TestAppState::new());

    let response = get(&app, "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json::<Value>().unwrap(), json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_health_db_down() {
    let app = build_test_router(TestAppState::new().with_db_health(DbHealth::Down));

    let response = get(&app, "/health", None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error_code().as_deref(), Some("db_down"));
}

#[tokio::test]
async fn test_health_db_query_failed() {
    let app = build_test_router(TestAppState::new().with_db_health(DbHealth::QueryFailed));

    let response = get(&app, "/health", None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error_code().as_deref(), Some("db_query_failed"));
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = build_test_router(TestAppState::new());

    for (method, path) in [
        (Method::GET, "/nope"),
        (Method::PUT, "/v1/cart"),
        (Method::GET, "/v1/auth/login"),
    ] {
        let response = send(&app, method, path, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error_code().as_deref(), Some("not_found"));
        assert!(response
            .content_type
            .unwrap_or_default()
            .starts_with("application/json"));
    }
}

#[tokio::test]
async fn test_metrics_disabled() {
    let app = build_test_router(TestAppState::new());
    assert_eq!(get(&app, "/metrics", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_enabled() {
    let app = build_test_router(TestAppState::new().with_metrics());

    let response = get(&app, "/metrics", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .content_type
        .unwrap_or_default()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_request_id_header_is_set() {
    let app = build_test_router(TestAppState::new());
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
}
