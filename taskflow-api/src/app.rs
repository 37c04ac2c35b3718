/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskflow_api::{app::AppState, config::Config};
/// use taskflow_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = taskflow_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use taskflow_shared::auth::{
    middleware::{bearer_token, resolve_user, AuthContext},
    password::PasswordPolicy,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Lifetime of newly issued access tokens
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.config.jwt.expire_minutes)
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        self.config.password_policy()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                    # Greeting (public)
/// ├── GET  /health              # Health check (public)
/// ├── /auth/
/// │   ├── POST /token           # OAuth2 password login (public)
/// │   └── POST /refresh_token   # New token for a valid one
/// ├── /users/
/// │   ├── POST   /              # Register (public)
/// │   ├── GET    /              # List (public)
/// │   ├── GET    /:id           # Read (public)
/// │   ├── PUT    /:id           # Replace own user
/// │   └── DELETE /:id           # Delete own user
/// ├── /teams/                   # POST, GET, GET/PATCH/DELETE /:id
/// ├── /projects/                # POST, GET, GET/PATCH/DELETE /:id
/// ├── /sprints/                 # POST, GET, GET/DELETE /:id
/// └── /todos/                   # POST, GET, PATCH/DELETE /:id
/// ```
///
/// Everything not marked public requires a bearer token.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth = middleware::from_fn_with_state(state.clone(), jwt_auth_layer);

    // Health check and greeting (public, no auth)
    let health_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/token", post(routes::auth::login))
        .merge(
            Router::new()
                .route("/refresh_token", post(routes::auth::refresh_token))
                .route_layer(auth.clone()),
        );

    // Reads and registration are public; changes need the owner's token
    let user_routes = Router::new()
        .route("/", post(routes::users::create_user).get(routes::users::list_users))
        .route("/:id", get(routes::users::get_user))
        .merge(
            Router::new()
                .route(
                    "/:id",
                    axum::routing::put(routes::users::update_user)
                        .delete(routes::users::delete_user),
                )
                .route_layer(auth.clone()),
        );

    let team_routes = Router::new()
        .route("/", post(routes::teams::create_team).get(routes::teams::list_teams))
        .route(
            "/:id",
            get(routes::teams::get_team)
                .patch(routes::teams::update_team)
                .delete(routes::teams::delete_team),
        )
        .route_layer(auth.clone());

    let project_routes = Router::new()
        .route(
            "/",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route_layer(auth.clone());

    let sprint_routes = Router::new()
        .route(
            "/",
            post(routes::sprints::create_sprint).get(routes::sprints::list_sprints),
        )
        .route(
            "/:id",
            get(routes::sprints::get_sprint).delete(routes::sprints::delete_sprint),
        )
        .route_layer(auth.clone());

    let todo_routes = Router::new()
        .route("/", post(routes::todos::create_todo).get(routes::todos::list_todos))
        .route(
            "/:id",
            axum::routing::patch(routes::todos::update_todo).delete(routes::todos::delete_todo),
        )
        .route_layer(auth);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/teams", team_routes)
        .nest("/projects", project_routes)
        .nest("/sprints", sprint_routes)
        .nest("/todos", todo_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Resolves the bearer token in the Authorization header to a user, then
/// injects an [`AuthContext`] into request extensions. Any failure is a 401.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;
    let user = resolve_user(&state.db, token, state.jwt_secret()).await?;

    req.extensions_mut().insert(AuthContext::from_user(&user));

    Ok(next.run(req).await)
}
