/// Shared helpers for the taskflow-shared integration tests
///
/// Every test gets its own private in-memory database with all migrations
/// applied, so tests never see each other's rows and can run in parallel.
/// Tests that need several connections use a file database inside a
/// `TempDir`, removed when the guard is dropped.

use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;
use taskflow_shared::db::migrations::run_migrations;
use taskflow_shared::db::pool::{create_pool, DatabaseConfig};
use taskflow_shared::models::user::{CreateUser, User};

/// Creates a fresh, migrated in-memory database
pub async fn setup_pool() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create in-memory pool");

    run_migrations(&pool).await.expect("Failed to run migrations");

    pool
}

/// Inserts a user directly, skipping password hashing
///
/// The stored hash is not a valid PHC string; use the user service when a
/// test needs to log in.
pub async fn insert_user(pool: &SqlitePool, username: &str) -> User {
    User::create(
        pool,
        CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("Failed to insert user")
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Pool settings for a database file inside `dir`
pub fn file_config(dir: &TempDir, max_connections: u32) -> (DatabaseConfig, PathBuf) {
    let path = dir.path().join("taskflow.db");

    let config = DatabaseConfig {
        url: format!("sqlite://{}", path.display()),
        max_connections,
        min_connections: 1,
        connect_timeout_seconds: 5,
        idle_timeout_seconds: Some(60),
        max_lifetime_seconds: Some(300),
        test_before_acquire: true,
    };

    (config, path)
}

/// Creates a fresh, migrated file database served by several connections
///
/// Keep the returned `TempDir` alive for as long as the pool is used.
pub async fn setup_file_pool(max_connections: u32) -> (SqlitePool, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (config, _) = file_config(&dir, max_connections);

    let pool = create_pool(config).await.expect("Failed to create file pool");
    run_migrations(&pool).await.expect("Failed to run migrations");

    (pool, dir)
}
