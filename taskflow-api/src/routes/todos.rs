/// Todo endpoints
///
/// Todos are private: every endpoint only sees the caller's own items, and
/// someone else's todo is reported as missing.
///
/// # Endpoints
///
/// - `POST /todos` - Create a todo
/// - `GET /todos?title=&description=&state=&offset=&limit=` - List own todos
/// - `PATCH /todos/:id` - Partial update
/// - `DELETE /todos/:id` - Delete a todo

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
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
    models::todo::{Todo, TodoFilter, TodoState, UpdateTodo, DEFAULT_TODO_LIMIT},
    services::todos::{self, NewTodo},
};

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: String,

    /// One of draft, todo, doing, done, trash
    pub state: TodoState,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
}

/// Raw list query; `state` is parsed separately to report it by name
#[derive(Debug, Deserialize)]
pub struct TodoQuery {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,

    #[serde(default)]
    pub offset: i64,

    #[serde(default = "default_todo_limit")]
    pub limit: i64,
}

fn default_todo_limit() -> i64 {
    DEFAULT_TODO_LIMIT
}

impl TryFrom<TodoQuery> for TodoFilter {
    type Error = ApiError;

    fn try_from(query: TodoQuery) -> Result<Self, Self::Error> {
        let state = query
            .state
            .map(|state| state.parse::<TodoState>())
            .transpose()
            .map_err(|message| ApiError::validation("state", message))?;

        Ok(TodoFilter {
            title: query.title,
            description: query.description,
            state,
            offset: query.offset,
            limit: query.limit,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let Json(req) = body?;

    let todo = todos::create_todo(
        &state.db,
        auth.user_id,
        NewTodo {
            title: req.title,
            description: req.description,
            state: req.state,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// List the caller's todos
///
/// Filters are AND-combined; `title` and `description` match substrings,
/// `state` matches exactly. Defaults: `offset=0`, `limit=100`.
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    query: Result<Query<TodoQuery>, QueryRejection>,
) -> ApiResult<Json<TodoListResponse>> {
    let Query(query) = query?;
    let filter = TodoFilter::try_from(query)?;

    let todos = todos::list_todos(&state.db, auth.user_id, &filter).await?;

    Ok(Json(TodoListResponse { todos }))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let Path(id) = id?;
    let Json(req) = body?;

    let todo = todos::update_todo(
        &state.db,
        auth.user_id,
        id,
        UpdateTodo {
            title: req.title,
            description: req.description,
            state: req.state,
        },
    )
    .await?;

    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;

    todos::delete_todo(&state.db, auth.user_id, id).await?;

    Ok(Json(MessageResponse::new("Todo deleted")))
}
