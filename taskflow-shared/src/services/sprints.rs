/// Sprint register
///
/// Any authenticated user may open a sprint on an existing project. Only the
/// user who created a sprint may delete it.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::projects::PROJECT_NOT_FOUND;
use crate::db::pool::begin_write;
use crate::error::{DomainError, DomainResult};
use crate::models::project::Project;
use crate::models::sprint::{CreateSprint, Sprint};

pub const SPRINT_NOT_FOUND: &str = "Sprint not found";

#[derive(Debug, Clone)]
pub struct NewSprint {
    pub sprint_name: String,

    /// Name of the project the sprint belongs to
    pub project_name: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
}

/// Opens a sprint
///
/// Precedence: date range (422) → project exists (404).
pub async fn create_sprint(pool: &SqlitePool, owner_id: i64, input: NewSprint) -> DomainResult<Sprint> {
    if input.end_date < input.start_date {
        return Err(DomainError::validation(
            "end_date",
            "End date must not be before start date",
        ));
    }

    let mut tx = begin_write(pool).await?;

    let project = Project::find_by_name(&mut *tx, &input.project_name)
        .await?
        .ok_or_else(|| DomainError::not_found(PROJECT_NOT_FOUND))?;

    let sprint_id = Sprint::create(
        &mut *tx,
        CreateSprint {
            sprint_name: input.sprint_name,
            project_id: project.id,
            start_date: input.start_date,
            end_date: input.end_date,
            description: input.description,
            current_user_id: owner_id,
        },
    )
    .await?;

    let sprint = Sprint::find_by_id(&mut *tx, sprint_id)
        .await?
        .ok_or_else(|| DomainError::not_found(SPRINT_NOT_FOUND))?;

    tx.commit().await?;

    info!(
        sprint_id,
        project_id = project.id,
        owner_id,
        "Sprint created"
    );
    Ok(sprint)
}

pub async fn list_sprints(pool: &SqlitePool, project_id: Option<i64>) -> DomainResult<Vec<Sprint>> {
    let sprints = Sprint::list(pool, project_id).await?;

    debug!(count = sprints.len(), project_id = ?project_id, "Listed sprints");
    Ok(sprints)
}

pub async fn get_sprint(pool: &SqlitePool, sprint_id: i64) -> DomainResult<Sprint> {
    Sprint::find_by_id(pool, sprint_id)
        .await?
        .ok_or_else(|| DomainError::not_found(SPRINT_NOT_FOUND))
}

/// Deletes a sprint; only its creator may do so
pub async fn delete_sprint(pool: &SqlitePool, caller_id: i64, sprint_id: i64) -> DomainResult<()> {
    let mut tx = begin_write(pool).await?;

    let sprint = Sprint::find_by_id(&mut *tx, sprint_id)
        .await?
        .ok_or_else(|| DomainError::not_found(SPRINT_NOT_FOUND))?;

    if sprint.current_user_id != caller_id {
        return Err(DomainError::forbidden());
    }

    Sprint::delete(&mut *tx, sprint_id).await?;
    tx.commit().await?;

    info!(sprint_id, "Sprint deleted");
    Ok(())
}
