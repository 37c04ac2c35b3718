/// Team endpoints
///
/// All endpoints require JWT authentication. Only a team's owner may change
/// or delete it; being a member grants nothing.
///
/// # Endpoints
///
/// - `POST /teams` - Create a team
/// - `GET /teams?team_name=` - List teams, optionally by name substring
/// - `GET /teams/:id` - Read a team
/// - `PATCH /teams/:id` - Rename and/or replace members
/// - `DELETE /teams/:id` - Delete a team

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
    models::team::TeamPublic,
    services::teams::{self, NewTeam, TeamChanges},
};
use validator::Validate;

/// Create team request
///
/// ```json
/// {
///   "team_name": "bolinha",
///   "user_list": ["mari", "bia"]
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, message = "Team name must not be empty"))]
    pub team_name: String,

    /// Usernames of the members; duplicates collapse
    pub user_list: Vec<String>,
}

/// Update team request; absent fields are left alone
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, message = "Team name must not be empty"))]
    pub team_name: Option<String>,

    /// Replaces the whole member set when present
    pub user_list: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct TeamFilter {
    pub team_name: Option<String>,
}

/// Create a team owned by the caller
///
/// # Errors
///
/// - `404 Not Found`: One or more users do not exist
/// - `409 Conflict`: Team already created
/// - `422 Unprocessable Entity`: Empty member list
pub async fn create_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeamPublic>)> {
    let Json(req) = body?;
    req.validate()?;

    let team = teams::create_team(
        &state.db,
        auth.user_id,
        NewTeam {
            team_name: req.team_name,
            usernames: req.user_list,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn list_teams(
    State(state): State<AppState>,
    filter: Result<Query<TeamFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<TeamPublic>>> {
    let Query(filter) = filter?;

    let teams = teams::list_teams(&state.db, filter.team_name.as_deref()).await?;

    Ok(Json(teams))
}

pub async fn get_team(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<TeamPublic>> {
    let Path(id) = id?;

    Ok(Json(teams::get_team(&state.db, id).await?))
}

/// Rename a team and/or replace its members
///
/// # Errors
///
/// Checked in this order:
/// - `404 Not Found`: Team not found
/// - `403 Forbidden`: Caller is not the owner
/// - `422 Unprocessable Entity`: Empty member list
/// - `404 Not Found`: One or more users do not exist
/// - `409 Conflict`: Another team has the new name
pub async fn update_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTeamRequest>, JsonRejection>,
) -> ApiResult<Json<TeamPublic>> {
    let Path(id) = id?;
    let Json(req) = body?;
    req.validate()?;

    let team = teams::update_team(
        &state.db,
        auth.user_id,
        id,
        TeamChanges {
            team_name: req.team_name,
            usernames: req.user_list,
        },
    )
    .await?;

    Ok(Json(team))
}

pub async fn delete_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;

    teams::delete_team(&state.db, auth.user_id, id).await?;

    Ok(Json(MessageResponse::new("Team deleted")))
}
