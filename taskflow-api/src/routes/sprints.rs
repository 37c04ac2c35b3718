/// Sprint endpoints
///
/// Any authenticated user may open a sprint on an existing project; only the
/// sprint's creator may delete it.
///
/// # Endpoints
///
/// - `POST /sprints` - Create a sprint
/// - `GET /sprints?project_id=` - List sprints, ordered by start date
/// - `GET /sprints/:id` - Read a sprint
/// - `DELETE /sprints/:id` - Delete a sprint

use crate::{app::AppState, error::ApiResult, routes::MessageResponse};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use taskflow_shared::{
    auth::middleware::AuthContext,
    models::sprint::Sprint,
    services::sprints::{self, NewSprint},
};
use validator::Validate;

/// Create sprint request
///
/// ```json
/// {
///   "sprint_name": "Sprint 1",
///   "project_name": "apollo",
///   "start_date": "2024-05-01",
///   "end_date": "2024-05-14",
///   "description": "First iteration"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSprintRequest {
    #[validate(length(min = 1, message = "Sprint name must not be empty"))]
    pub sprint_name: String,

    pub project_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct SprintFilter {
    pub project_id: Option<i64>,
}

/// Create a sprint
///
/// # Errors
///
/// - `422 Unprocessable Entity`: `end_date` before `start_date`
/// - `404 Not Found`: Project not found
pub async fn create_sprint(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<CreateSprintRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Sprint>)> {
    let Json(req) = body?;
    req.validate()?;

    let sprint = sprints::create_sprint(
        &state.db,
        auth.user_id,
        NewSprint {
            sprint_name: req.sprint_name,
            project_name: req.project_name,
            start_date: req.start_date,
            end_date: req.end_date,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(sprint)))
}

pub async fn list_sprints(
    State(state): State<AppState>,
    filter: Result<Query<SprintFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Sprint>>> {
    let Query(filter) = filter?;

    Ok(Json(sprints::list_sprints(&state.db, filter.project_id).await?))
}

pub async fn get_sprint(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Sprint>> {
    let Path(id) = id?;

    Ok(Json(sprints::get_sprint(&state.db, id).await?))
}

pub async fn delete_sprint(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;

    sprints::delete_sprint(&state.db, auth.user_id, id).await?;

    Ok(Json(MessageResponse::new("Sprint deleted")))
}
