/// Project membership engine
///
/// Same rules as the team engine one level up: a project's team set is
/// replaced as a whole from a list of team names, and only the owner may
/// mutate or delete the project. The error precedence is identical.
///
/// Deleting a project deletes its sprints; the teams themselves remain.

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::membership::{dedupe, require_all_resolved, require_non_empty};
use crate::db::pool::begin_write;
use crate::error::{DomainError, DomainResult};
use crate::models::project::{CreateProject, Project, ProjectPublic};
use crate::models::team::Team;

pub const TEAMS_NOT_FOUND: &str = "One or more teams do not exist";
pub const PROJECT_ALREADY_CREATED: &str = "Project already created";
pub const PROJECT_NAME_IN_USE: &str = "Project name already in use";
pub const PROJECT_NOT_FOUND: &str = "Project not found";

const MEMBER_FIELD: &str = "team_list";

#[derive(Debug, Clone)]
pub struct NewProject {
    pub project_name: String,
    pub team_names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub project_name: Option<String>,
    pub team_names: Option<Vec<String>>,
}

async fn resolve_teams(
    conn: &mut sqlx::SqliteConnection,
    team_names: &[String],
) -> DomainResult<Vec<i64>> {
    require_non_empty(team_names, MEMBER_FIELD)?;

    let requested = dedupe(team_names);
    let teams = Team::find_by_names(&mut *conn, &requested).await?;
    require_all_resolved(&requested, &teams, TEAMS_NOT_FOUND)?;

    Ok(teams.into_iter().map(|team| team.id).collect())
}

async fn owned_project(
    conn: &mut sqlx::SqliteConnection,
    project_id: i64,
    caller_id: i64,
) -> DomainResult<Project> {
    let project = Project::find_by_id(&mut *conn, project_id)
        .await?
        .ok_or_else(|| DomainError::not_found(PROJECT_NOT_FOUND))?;

    if project.current_user_id != caller_id {
        return Err(DomainError::forbidden());
    }

    Ok(project)
}

pub async fn create_project(
    pool: &SqlitePool,
    owner_id: i64,
    input: NewProject,
) -> DomainResult<ProjectPublic> {
    let mut tx = begin_write(pool).await?;

    let team_ids = resolve_teams(&mut tx, &input.team_names).await?;

    if Project::name_taken(&mut *tx, &input.project_name, None).await? {
        return Err(DomainError::conflict(PROJECT_ALREADY_CREATED));
    }

    let project = Project::create(
        &mut *tx,
        CreateProject {
            project_name: input.project_name,
            current_user_id: owner_id,
        },
    )
    .await
    .map_err(|e| DomainError::from_write(e, PROJECT_ALREADY_CREATED))?;

    Project::replace_teams(&mut tx, project.id, &team_ids).await?;

    let public = project.to_public(&mut tx).await?;
    tx.commit().await?;

    info!(
        project_id = public.id,
        project_name = %public.project_name,
        owner_id,
        teams = public.teams.len(),
        "Project created"
    );
    Ok(public)
}

pub async fn list_projects(
    pool: &SqlitePool,
    name_filter: Option<&str>,
) -> DomainResult<Vec<ProjectPublic>> {
    let mut tx = pool.begin().await?;

    let projects = Project::list(&mut *tx, name_filter).await?;

    let mut public = Vec::with_capacity(projects.len());
    for project in projects {
        public.push(project.to_public(&mut tx).await?);
    }

    tx.commit().await?;

    debug!(count = public.len(), filter = ?name_filter, "Listed projects");
    Ok(public)
}

pub async fn get_project(pool: &SqlitePool, project_id: i64) -> DomainResult<ProjectPublic> {
    let mut tx = pool.begin().await?;

    let project = Project::find_by_id(&mut *tx, project_id)
        .await?
        .ok_or_else(|| DomainError::not_found(PROJECT_NOT_FOUND))?;
    let public = project.to_public(&mut tx).await?;

    tx.commit().await?;
    Ok(public)
}

pub async fn update_project(
    pool: &SqlitePool,
    caller_id: i64,
    project_id: i64,
    changes: ProjectChanges,
) -> DomainResult<ProjectPublic> {
    let mut tx = begin_write(pool).await?;

    let mut project = owned_project(&mut tx, project_id, caller_id).await?;

    let team_ids = match &changes.team_names {
        Some(team_names) => Some(resolve_teams(&mut tx, team_names).await?),
        None => None,
    };

    if let Some(project_name) = &changes.project_name {
        if Project::name_taken(&mut *tx, project_name, Some(project_id)).await? {
            return Err(DomainError::conflict(PROJECT_NAME_IN_USE));
        }

        project = Project::rename(&mut *tx, project_id, project_name)
            .await
            .map_err(|e| DomainError::from_write(e, PROJECT_NAME_IN_USE))?
            .ok_or_else(|| DomainError::not_found(PROJECT_NOT_FOUND))?;
    }

    if let Some(team_ids) = &team_ids {
        Project::replace_teams(&mut tx, project_id, team_ids).await?;
        if changes.project_name.is_none() {
            Project::touch(&mut *tx, project_id).await?;
        }
    }

    let public = project.to_public(&mut tx).await?;
    tx.commit().await?;

    info!(
        project_id,
        renamed = changes.project_name.is_some(),
        teams_replaced = team_ids.is_some(),
        "Project updated"
    );
    Ok(public)
}

pub async fn delete_project(pool: &SqlitePool, caller_id: i64, project_id: i64) -> DomainResult<()> {
    let mut tx = begin_write(pool).await?;

    owned_project(&mut tx, project_id, caller_id).await?;
    Project::delete(&mut *tx, project_id).await?;

    tx.commit().await?;

    info!(project_id, "Project deleted");
    Ok(())
}
