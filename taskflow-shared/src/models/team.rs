/// Team model and database operations
///
/// A team has exactly one owner (`current_user_id`, the creator) and a set of
/// member users stored in the `teams_users` join table. The two relations are
/// independent: the owner is not implicitly a member, and members have no
/// mutation rights.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     team_name TEXT NOT NULL,                    -- unique index
///     current_user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE RESTRICT,
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
///
/// CREATE TABLE teams_users (
///     user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     team_id INTEGER NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
///     PRIMARY KEY (user_id, team_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection};

use super::user::{User, UserPublic};

const TEAM_COLUMNS: &str = "id, team_name, current_user_id, created_at, updated_at";

/// Team row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub team_name: String,

    /// Owner, fixed at creation
    pub current_user_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Team with its members resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPublic {
    pub id: i64,
    pub team_name: String,
    pub current_user_id: i64,
    pub users: Vec<UserPublic>,
}

#[derive(Debug, Clone)]
pub struct CreateTeam {
    pub team_name: String,
    pub current_user_id: i64,
}

impl Team {
    pub async fn create<'e, E>(executor: E, data: CreateTeam) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();

        let team = sqlx::query_as::<_, Team>(&format!(
            "INSERT INTO teams (team_name, current_user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(data.team_name)
        .bind(data.current_user_id)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(team)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(team)
    }

    /// Finds every team whose name is in `names`
    ///
    /// Unknown names are skipped.
    pub async fn find_by_names<'e, E>(executor: E, names: &[String]) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE team_name IN ("
        ));
        let mut separated = builder.separated(", ");
        for name in names {
            separated.push_bind(name);
        }
        separated.push_unseparated(") ORDER BY id");

        let teams = builder.build_query_as::<Team>().fetch_all(executor).await?;

        Ok(teams)
    }

    /// Checks whether `team_name` is held by a team other than `except_id`
    pub async fn name_taken<'e, E>(
        executor: E,
        team_name: &str,
        except_id: Option<i64>,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM teams WHERE team_name = ? AND id IS NOT ?)",
        )
        .bind(team_name)
        .bind(except_id)
        .fetch_one(executor)
        .await?;

        Ok(taken)
    }

    /// Lists teams, optionally keeping only names containing `name_filter`
    ///
    /// The substring match is case-sensitive.
    pub async fn list<'e, E>(executor: E, name_filter: Option<&str>) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams
             WHERE ?1 IS NULL OR instr(team_name, ?1) > 0
             ORDER BY id"
        ))
        .bind(name_filter)
        .fetch_all(executor)
        .await?;

        Ok(teams)
    }

    /// Renames a team
    pub async fn rename<'e, E>(executor: E, id: i64, team_name: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let team = sqlx::query_as::<_, Team>(&format!(
            "UPDATE teams SET team_name = ?, updated_at = ? WHERE id = ?
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(team_name)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(team)
    }

    /// Bumps `updated_at` without changing anything else
    pub async fn touch<'e, E>(executor: E, id: i64) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE teams SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Deletes a team
    ///
    /// Member links and project links are removed by `ON DELETE CASCADE`.
    /// Users and projects themselves are untouched.
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the whole member set of a team
    ///
    /// Members not in `user_ids` lose their link, new ones gain it. Passing
    /// the current set leaves the membership unchanged. Must run inside the
    /// caller's transaction so the replacement is atomic.
    pub async fn replace_members(
        conn: &mut SqliteConnection,
        team_id: i64,
        user_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM teams_users WHERE team_id = ?")
            .bind(team_id)
            .execute(&mut *conn)
            .await?;

        if user_ids.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Sqlite>::new("INSERT INTO teams_users (user_id, team_id) ");
        builder.push_values(user_ids, |mut row, user_id| {
            row.push_bind(*user_id).push_bind(team_id);
        });
        builder.push(" ON CONFLICT DO NOTHING");

        builder.build().execute(&mut *conn).await?;

        Ok(())
    }

    /// Loads the member users of a team
    pub async fn members<'e, E>(executor: E, team_id: i64) -> Result<Vec<User>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.password, u.created_at, u.updated_at
             FROM users u
             JOIN teams_users tu ON tu.user_id = u.id
             WHERE tu.team_id = ?
             ORDER BY u.id",
        )
        .bind(team_id)
        .fetch_all(executor)
        .await?;

        Ok(users)
    }

    /// Builds the public view of a team with its current members
    pub async fn to_public(self, conn: &mut SqliteConnection) -> Result<TeamPublic, sqlx::Error> {
        let users = Team::members(&mut *conn, self.id).await?;

        Ok(TeamPublic {
            id: self.id,
            team_name: self.team_name,
            current_user_id: self.current_user_id,
            users: users.into_iter().map(UserPublic::from).collect(),
        })
    }
}
