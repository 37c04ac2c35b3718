/// User endpoints
///
/// Registration and reads are public. Updating or deleting a user requires
/// that user's own bearer token.
///
/// # Endpoints
///
/// - `POST /users` - Register a user
/// - `GET /users?limit=&offset=` - List users (`skip` is accepted for `offset`)
/// - `GET /users/:id` - Read a user
/// - `PUT /users/:id` - Replace username, email and password
/// - `DELETE /users/:id` - Delete a user

use crate::{
    app::AppState,
    error::ApiResult,
    routes::MessageResponse,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    auth::middleware::AuthContext,
    models::user::UserPublic,
    services::users::{self, UserInput},
};
use validator::Validate;

const DEFAULT_USER_LIMIT: i64 = 10;

/// Body of user registration and replacement
#[derive(Debug, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Length is checked against the configured password policy
    pub password: String,
}

impl From<UserRequest> for UserInput {
    fn from(req: UserRequest) -> Self {
        UserInput {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[serde(default = "default_user_limit")]
    #[validate(range(min = 0, message = "Must not be negative"))]
    pub limit: i64,

    #[serde(default, alias = "skip")]
    #[validate(range(min = 0, message = "Must not be negative"))]
    pub offset: i64,
}

fn default_user_limit() -> i64 {
    DEFAULT_USER_LIMIT
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserPublic>,
}

/// Register a user
///
/// # Errors
///
/// - `409 Conflict`: Username or email already exists
/// - `422 Unprocessable Entity`: Invalid email, password too short
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserPublic>)> {
    let Json(req) = body?;
    req.validate()?;

    let user = users::create_user(&state.db, &state.password_policy(), req.into()).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> ApiResult<Json<UserListResponse>> {
    let Query(query) = query?;
    query.validate()?;

    let users = users::list_users(&state.db, query.limit, query.offset).await?;

    Ok(Json(UserListResponse { users }))
}

pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<UserPublic>> {
    let Path(id) = id?;

    Ok(Json(users::get_user(&state.db, id).await?))
}

/// Replace the caller's own user
///
/// # Errors
///
/// - `403 Forbidden`: Target is not the caller
/// - `404 Not Found`: No such user
/// - `409 Conflict`: Username or email held by another user
/// - `422 Unprocessable Entity`: Invalid body, password too short
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<Json<UserPublic>> {
    let Path(id) = id?;
    let Json(req) = body?;
    req.validate()?;

    let user = users::update_user(
        &state.db,
        &state.password_policy(),
        auth.user_id,
        id,
        req.into(),
    )
    .await?;

    Ok(Json(user))
}

/// Delete the caller's own user
///
/// Blocked with `409 Conflict` while the user still owns teams, projects or
/// sprints. Their todos and team memberships go with them.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;

    users::delete_user(&state.db, auth.user_id, id).await?;

    Ok(Json(MessageResponse::new("User deleted")))
}
