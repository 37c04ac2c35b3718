/// Project endpoints
///
/// Same shape as the team endpoints, one level up: a project's members are
/// teams, named in `team_list`.
///
/// # Endpoints
///
/// - `POST /projects` - Create a project
/// - `GET /projects?project_name=` - List projects
/// - `GET /projects/:id` - Read a project with its teams and their members
/// - `PATCH /projects/:id` - Rename and/or replace teams
/// - `DELETE /projects/:id` - Delete a project and its sprints

use crate::{app::AppState, error::ApiResult, routes::MessageResponse};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskflow_shared::{
    auth::middleware::AuthContext,
    models::project::ProjectPublic,
    services::projects::{self, NewProject, ProjectChanges},
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "Project name must not be empty"))]
    pub project_name: String,

    pub team_list: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, message = "Project name must not be empty"))]
    pub project_name: Option<String>,

    pub team_list: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectFilter {
    pub project_name: Option<String>,
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProjectPublic>)> {
    let Json(req) = body?;
    req.validate()?;

    let project = projects::create_project(
        &state.db,
        auth.user_id,
        NewProject {
            project_name: req.project_name,
            team_names: req.team_list,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    filter: Result<Query<ProjectFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<ProjectPublic>>> {
    let Query(filter) = filter?;

    let projects = projects::list_projects(&state.db, filter.project_name.as_deref()).await?;

    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ProjectPublic>> {
    let Path(id) = id?;

    Ok(Json(projects::get_project(&state.db, id).await?))
}

pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateProjectRequest>, JsonRejection>,
) -> ApiResult<Json<ProjectPublic>> {
    let Path(id) = id?;
    let Json(req) = body?;
    req.validate()?;

    let project = projects::update_project(
        &state.db,
        auth.user_id,
        id,
        ProjectChanges {
            project_name: req.project_name,
            team_names: req.team_list,
        },
    )
    .await?;

    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;

    projects::delete_project(&state.db, auth.user_id, id).await?;

    Ok(Json(MessageResponse::new("Project deleted")))
}
