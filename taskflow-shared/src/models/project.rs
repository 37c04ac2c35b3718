/// Project model and database operations
///
/// Projects mirror teams one level up: one owner (`current_user_id`) and a
/// set of member teams in the `projects_teams` join table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     project_name TEXT NOT NULL,                 -- unique index
///     current_user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE RESTRICT,
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
///
/// CREATE TABLE projects_teams (
///     project_id INTEGER NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
///     team_id INTEGER NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
///     PRIMARY KEY (project_id, team_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection};

use super::team::{Team, TeamPublic};

const PROJECT_COLUMNS: &str = "id, project_name, current_user_id, created_at, updated_at";

/// Project row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub project_name: String,
    pub current_user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project with its teams, and their members, resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPublic {
    pub id: i64,
    pub project_name: String,
    pub current_user_id: i64,
    pub teams: Vec<TeamPublic>,
}

#[derive(Debug, Clone)]
pub struct CreateProject {
    pub project_name: String,
    pub current_user_id: i64,
}

impl Project {
    pub async fn create<'e, E>(executor: E, data: CreateProject) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();

        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (project_name, current_user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(data.project_name)
        .bind(data.current_user_id)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(project)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    pub async fn find_by_name<'e, E>(
        executor: E,
        project_name: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE project_name = ?"
        ))
        .bind(project_name)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    /// Checks whether `project_name` is held by a project other than `except_id`
    pub async fn name_taken<'e, E>(
        executor: E,
        project_name: &str,
        except_id: Option<i64>,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM projects WHERE project_name = ? AND id IS NOT ?)",
        )
        .bind(project_name)
        .bind(except_id)
        .fetch_one(executor)
        .await?;

        Ok(taken)
    }

    /// Lists projects, optionally keeping only names containing `name_filter`
    pub async fn list<'e, E>(executor: E, name_filter: Option<&str>) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE ?1 IS NULL OR instr(project_name, ?1) > 0
             ORDER BY id"
        ))
        .bind(name_filter)
        .fetch_all(executor)
        .await?;

        Ok(projects)
    }

    pub async fn rename<'e, E>(
        executor: E,
        id: i64,
        project_name: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let project = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET project_name = ?, updated_at = ? WHERE id = ?
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project_name)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    pub async fn touch<'e, E>(executor: E, id: i64) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE projects SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Deletes a project together with its team links and sprints
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the whole team set of a project
    ///
    /// Same semantics as [`Team::replace_members`].
    pub async fn replace_teams(
        conn: &mut SqliteConnection,
        project_id: i64,
        team_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM projects_teams WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *conn)
            .await?;

        if team_ids.is_empty() {
            return Ok(());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new("INSERT INTO projects_teams (project_id, team_id) ");
        builder.push_values(team_ids, |mut row, team_id| {
            row.push_bind(project_id).push_bind(*team_id);
        });
        builder.push(" ON CONFLICT DO NOTHING");

        builder.build().execute(&mut *conn).await?;

        Ok(())
    }

    /// Loads the teams linked to a project
    pub async fn teams<'e, E>(executor: E, project_id: i64) -> Result<Vec<Team>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT t.id, t.team_name, t.current_user_id, t.created_at, t.updated_at
             FROM teams t
             JOIN projects_teams pt ON pt.team_id = t.id
             WHERE pt.project_id = ?
             ORDER BY t.id",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;

        Ok(teams)
    }

    /// Builds the public view: teams and their members are read live, so
    /// renamed users and deleted teams show up immediately
    pub async fn to_public(self, conn: &mut SqliteConnection) -> Result<ProjectPublic, sqlx::Error> {
        let teams = Project::teams(&mut *conn, self.id).await?;

        let mut public_teams = Vec::with_capacity(teams.len());
        for team in teams {
            public_teams.push(team.to_public(&mut *conn).await?);
        }

        Ok(ProjectPublic {
            id: self.id,
            project_name: self.project_name,
            current_user_id: self.current_user_id,
            teams: public_teams,
        })
    }
}
