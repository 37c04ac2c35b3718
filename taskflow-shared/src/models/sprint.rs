/// Sprint model and database operations
///
/// A sprint is a dated iteration of a project. Deleting the project deletes
/// its sprints; the creating user cannot be deleted while sprints remain.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite};

/// Sprint row joined with its project's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sprint {
    pub id: i64,
    pub sprint_name: String,
    pub project_id: i64,
    pub project_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub current_user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSprint {
    pub sprint_name: String,
    pub project_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub current_user_id: i64,
}

const SPRINT_SELECT: &str = "SELECT s.id, s.sprint_name, s.project_id, p.project_name,
            s.start_date, s.end_date, s.description, s.current_user_id,
            s.created_at, s.updated_at
     FROM sprints s
     JOIN projects p ON p.id = s.project_id";

impl Sprint {
    /// Inserts a sprint and returns its ID
    pub async fn create<'e, E>(executor: E, data: CreateSprint) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sprints
                 (sprint_name, project_id, start_date, end_date, description,
                  current_user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(data.sprint_name)
        .bind(data.project_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.description)
        .bind(data.current_user_id)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sprint = sqlx::query_as::<_, Sprint>(&format!("{SPRINT_SELECT} WHERE s.id = ?"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(sprint)
    }

    /// Lists sprints ordered by start date, optionally for one project only
    pub async fn list<'e, E>(executor: E, project_id: Option<i64>) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sprints = sqlx::query_as::<_, Sprint>(&format!(
            "{SPRINT_SELECT}
             WHERE ?1 IS NULL OR s.project_id = ?1
             ORDER BY s.start_date, s.id"
        ))
        .bind(project_id)
        .fetch_all(executor)
        .await?;

        Ok(sprints)
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM sprints WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
