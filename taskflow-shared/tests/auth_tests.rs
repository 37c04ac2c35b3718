/// Integration tests for bearer token resolution

mod common;

use chrono::{Duration, Utc};
use common::{insert_user, setup_pool};
use taskflow_shared::auth::jwt::{create_token, Claims, JwtError};
use taskflow_shared::auth::middleware::{resolve_user, AuthError};

const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

#[tokio::test]
async fn test_resolve_user_from_valid_token() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    let token = create_token(&Claims::new(&user.email, Duration::minutes(30)), SECRET).unwrap();

    let resolved = resolve_user(&pool, &token, SECRET).await.unwrap();
    assert_eq!(resolved.id, user.id);
}

#[tokio::test]
async fn test_resolve_user_rejects_expired_token() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    let issued = Utc::now() - Duration::hours(2);
    let claims = Claims::issued_at(&user.email, issued, Duration::minutes(30));
    let token = create_token(&claims, SECRET).unwrap();

    let result = resolve_user(&pool, &token, SECRET).await;
    assert!(matches!(result, Err(AuthError::InvalidToken(JwtError::Expired))));
}

#[tokio::test]
async fn test_resolve_user_rejects_wrong_secret() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    let token = create_token(
        &Claims::new(&user.email, Duration::minutes(30)),
        "another-secret-key-at-least-32-bytes",
    )
    .unwrap();

    let result = resolve_user(&pool, &token, SECRET).await;
    assert!(matches!(result, Err(AuthError::InvalidToken(_))));
}

#[tokio::test]
async fn test_resolve_user_for_deleted_subject() {
    let pool = setup_pool().await;

    let token = create_token(
        &Claims::new("ghost@example.com", Duration::minutes(30)),
        SECRET,
    )
    .unwrap();

    let result = resolve_user(&pool, &token, SECRET).await;
    assert!(matches!(result, Err(AuthError::UnknownSubject)));
}
