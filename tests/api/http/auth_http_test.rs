//! Auth endpoint tests: register, login, /v1/me and bearer handling

use super::{build_test_router, get, post, register_and_login, send, TestAppState};
use crate::api::{create_test_jwt_manager, test_jwt_config};
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn credentials(email: &str, password: &str) -> String {
    json!({ "email": email, "password": password }).to_string()
}

#[tokio::test]
async fn test_register_returns_created_id() {
    let app = build_test_router(TestAppState::new());

    let response = post(&app, "/v1/auth/register", None, &credentials("a@b.com", "password1")).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json::<Value>().unwrap(), json!({ "id": 1 }));
}

#[tokio::test]
async fn test_register_duplicate_email_is_conflict() {
    let app = build_test_router(TestAppState::new());

    let first = post(&app, "/v1/auth/register", None, &credentials("A@B.com", "password1")).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = post(&app, "/v1/auth/register", None, &credentials(" a@b.com ", "password2")).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error_code().as_deref(), Some("email_taken"));
}

#[tokio::test]
async fn test_register_short_password() {
    let state = TestAppState::new();
    let user_repo = state.user_repo.clone();
    let app = build_test_router(state);

    let response = post(&app, "/v1/auth/register", None, &credentials("u@x.com", "1234567")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code().as_deref(), Some("validation"));
    assert_eq!(user_repo.count().await, 0);
}

#[tokio::test]
async fn test_register_invalid_json() {
    let app = build_test_router(TestAppState::new());

    let response = post(&app, "/v1/auth/register", None, "{not json").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code().as_deref(), Some("invalid_json"));
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = build_test_router(TestAppState::new());
    post(&app, "/v1/auth/register", None, &credentials("u@x.com", "password1")).await;

    let response = post(&app, "/v1/auth/login", None, &credentials("U@X.COM ", "password1")).await;

    assert_eq!(response.status, StatusCode::OK);
    let body: Value = response.json().unwrap();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 7200);

    let claims = create_test_jwt_manager()
        .verify_access_token(body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, "1");
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_login_failures_look_identical() {
    let app = build_test_router(TestAppState::new());
    post(&app, "/v1/auth/register", None, &credentials("u@x.com", "password1")).await;

    let wrong_password = post(&app, "/v1/auth/login", None, &credentials("u@x.com", "password2")).await;
    let unknown_email = post(&app, "/v1/auth/login", None, &credentials("no@x.com", "password1")).await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(
        wrong_password.error_code().as_deref(),
        Some("invalid_credentials")
    );
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = build_test_router(TestAppState::new());
    let (id, token) = register_and_login(&app, "Me@Example.com", "password1").await;

    let response = get(&app, "/v1/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json::<Value>().unwrap(),
        json!({ "id": id, "email": "me@example.com", "role": "user" })
    );
}

#[tokio::test]
async fn test_me_without_token() {
    let app = build_test_router(TestAppState::new());

    let response = get(&app, "/v1/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code().as_deref(), Some("missing_bearer_token"));
}

#[tokio::test]
async fn test_lowercase_bearer_scheme_rejected() {
    let app = build_test_router(TestAppState::new());
    let token = crate::api::create_test_token(1);

    let request = axum::http::Request::builder()
        .uri("/v1/me")
        .header("authorization", format!("bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_invalid_tokens() {
    let app = build_test_router(TestAppState::new());
    let now = Utc::now().timestamp();
    let secret = test_jwt_config().secret;

    let hs512 = encode(
        &Header::new(Algorithm::HS512),
        &json!({ "sub": "1", "exp": now + 600 }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();
    let wrong_secret = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": "1", "exp": now + 600 }),
        &EncodingKey::from_secret(b"some-other-secret-that-is-long-enough"),
    )
    .unwrap();
    let expired = create_test_jwt_manager()
        .create_access_token_at(1, "user", Utc::now() - Duration::hours(3))
        .unwrap();

    for token in [hs512, wrong_secret, expired, "garbage".to_string()] {
        let response = get(&app, "/v1/me", Some(&token)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error_code().as_deref(), Some("invalid_token"));
    }
}

#[tokio::test]
async fn test_me_with_bad_subject() {
    let app = build_test_router(TestAppState::new());
    let now = Utc::now().timestamp();
    let secret = test_jwt_config().secret;

    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": "0", "role": "user", "exp": now + 600 }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    let response = get(&app, "/v1/me", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code().as_deref(), Some("invalid_token_subject"));
}

#[tokio::test]
async fn test_me_for_deleted_user() {
    let app = build_test_router(TestAppState::new());
    let token = crate::api::create_test_token(99);

    let response = send(&app, Method::GET, "/v1/me", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
