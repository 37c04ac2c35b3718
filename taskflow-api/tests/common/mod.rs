/// Common test utilities for the API integration tests
///
/// Each `TestContext` owns a private in-memory database with migrations
/// applied and a router built on top of it. Requests are driven straight
/// through the router as a `tower::Service`; no socket is opened.

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use sqlx::SqlitePool;
use taskflow_api::app::{build_router, AppState};
use taskflow_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, LogFormat, PasswordConfig};
use taskflow_shared::db::migrations::run_migrations;
use taskflow_shared::db::pool::{create_pool, DatabaseConfig as PoolConfig};
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Response captured for assertions
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A registered user and a valid bearer token for them
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub token: String,
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expire_minutes: 30,
        },
        password: PasswordConfig { min_length: 6 },
        log_format: LogFormat::Pretty,
    }
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> Self {
        let config = test_config();

        let db = create_pool(PoolConfig::in_memory())
            .await
            .expect("Failed to create in-memory pool");
        run_migrations(&db).await.expect("Failed to run migrations");

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        TestContext { db, app, config }
    }

    /// Sends a request, with an optional bearer token and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.call(request).await
    }

    /// Sends a prepared request
    pub async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Logs in through the OAuth2 form endpoint
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={}&password={}",
                urlencode(email),
                urlencode(password)
            )))
            .unwrap();

        self.call(request).await
    }

    /// Registers `username` with password "secret1" and logs them in
    pub async fn signup(&self, username: &str) -> TestUser {
        let email = format!("{}@example.com", username);

        let created = self
            .post(
                "/users",
                None,
                serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": "secret1",
                }),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "signup failed: {}", created.body);

        let login = self.login(&email, "secret1").await;
        assert_eq!(login.status, StatusCode::OK, "login failed: {}", login.body);

        TestUser {
            id: created.body["id"].as_i64().unwrap(),
            username: username.to_string(),
            email,
            token: login.body["access_token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a team owned by `owner`, asserting success
    pub async fn create_team(&self, owner: &TestUser, name: &str, members: &[&str]) -> Value {
        let response = self
            .post(
                "/teams",
                Some(&owner.token),
                serde_json::json!({ "team_name": name, "user_list": members }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    /// Creates a project owned by `owner`, asserting success
    pub async fn create_project(&self, owner: &TestUser, name: &str, teams: &[&str]) -> Value {
        let response = self
            .post(
                "/projects",
                Some(&owner.token),
                serde_json::json!({ "project_name": name, "team_list": teams }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}

/// Minimal form encoding for the characters used in test credentials
fn urlencode(value: &str) -> String {
    value.replace('%', "%25").replace('+', "%2B").replace('@', "%40").replace(' ', "+")
}

/// Sorted usernames of a team body
pub fn member_names(team: &Value) -> Vec<String> {
    let mut names: Vec<String> = team["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}
