/// Integration tests for login, token refresh and the JWT layer

mod common;

use axum::http::{header, StatusCode};
use chrono::{Duration, Utc};
use common::{TestContext, TEST_SECRET};
use taskflow_shared::auth::jwt::{create_token, Claims};

#[tokio::test]
async fn test_root_and_health_are_public() {
    let ctx = TestContext::new().await;

    let root = ctx.get("/", None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["message"], "Hello World");

    let health = ctx.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");
    assert_eq!(health.body["database"], "connected");
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let ctx = TestContext::new().await;
    let mari = ctx.signup("mari").await;

    let response = ctx.login(&mari.email, "secret1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "bearer");
    assert!(response.body["access_token"].is_string());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let ctx = TestContext::new().await;
    let mari = ctx.signup("mari").await;

    let response = ctx.login(&mari.email, "wrong-password").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["detail"], "Incorrect email or password");
    assert_eq!(response.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
}

#[tokio::test]
async fn test_login_with_unknown_email() {
    let ctx = TestContext::new().await;

    let response = ctx.login("nobody@example.com", "secret1").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["detail"], "Incorrect email or password");
}

#[tokio::test]
async fn test_login_with_malformed_form() {
    let ctx = TestContext::new().await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from("username=only"))
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_without_form_content_type() {
    let ctx = TestContext::new().await;
    ctx.signup("mari").await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            r#"{"username": "mari@example.com", "password": "secret1"}"#,
        ))
        .unwrap();

    let response = ctx.call(request).await;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.body["error"], "unsupported_media_type");
}

#[tokio::test]
async fn test_refresh_token() {
    let ctx = TestContext::new().await;
    let mari = ctx.signup("mari").await;

    let response = ctx.post("/auth/refresh_token", Some(&mari.token), serde_json::json!({})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "bearer");

    let fresh = response.body["access_token"].as_str().unwrap();
    let teams = ctx.get("/teams", Some(fresh)).await;
    assert_eq!(teams.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_requires_token() {
    let ctx = TestContext::new().await;

    let response = ctx.post("/auth/refresh_token", None, serde_json::json!({})).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await;

    for uri in ["/teams", "/projects", "/sprints", "/todos"] {
        let response = ctx.get(uri, None).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(response.body["detail"], "Could not validate credentials");
        assert_eq!(response.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }
}

#[tokio::test]
async fn test_bad_tokens_are_indistinguishable() {
    let ctx = TestContext::new().await;
    let mari = ctx.signup("mari").await;

    let expired = create_token(
        &Claims::issued_at(&mari.email, Utc::now() - Duration::hours(1), Duration::minutes(30)),
        TEST_SECRET,
    )
    .unwrap();

    let forged = create_token(
        &Claims::new(&mari.email, Duration::minutes(30)),
        "some-other-secret-at-least-32-bytes-long",
    )
    .unwrap();

    let unknown_subject = create_token(
        &Claims::new("ghost@example.com", Duration::minutes(30)),
        TEST_SECRET,
    )
    .unwrap();

    for token in [expired.as_str(), forged.as_str(), unknown_subject.as_str(), "garbage"] {
        let response = ctx.get("/teams", Some(token)).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["detail"], "Could not validate credentials");
    }
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let ctx = TestContext::new().await;
    let mari = ctx.signup("mari").await;

    let deleted = ctx.delete(&format!("/users/{}", mari.id), &mari.token).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let response = ctx.get("/todos", Some(&mari.token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
