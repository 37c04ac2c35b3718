/// User model and database operations
///
/// Users log in with their email and own teams, projects, sprints and todos.
/// They can also be members of any number of teams.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username TEXT NOT NULL,           -- unique index
///     email TEXT NOT NULL,              -- unique index
///     password TEXT NOT NULL,           -- Argon2id PHC string
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::models::user::{User, CreateUser};
/// use taskflow_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let new_user = CreateUser {
///     username: "mari".to_string(),
///     email: "mari@example.com".to_string(),
///     password: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// let found = User::find_by_email(&pool, "mari@example.com").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite};

const USER_COLUMNS: &str = "id, username, email, password, created_at, updated_at";

/// User account row
///
/// `password` holds the Argon2id hash and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, as nested in team and project responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password: String,
}

/// Full replacement of a user's mutable fields
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub username: String,
    pub email: String,

    /// Argon2id password hash
    pub password: String,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns a database error if the username or email is already taken
    /// (unique index violation).
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.password)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (the login identity)
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Finds every user whose username is in `usernames`
    ///
    /// Names that match no user are silently skipped; callers compare the
    /// result length with the number of distinct names they asked for.
    pub async fn find_by_usernames<'e, E>(
        executor: E,
        usernames: &[String],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username IN ("
        ));
        let mut separated = builder.separated(", ");
        for username in usernames {
            separated.push_bind(username);
        }
        separated.push_unseparated(") ORDER BY id");

        let users = builder.build_query_as::<User>().fetch_all(executor).await?;

        Ok(users)
    }

    /// Checks whether `username` belongs to a user other than `except_id`
    pub async fn username_taken<'e, E>(
        executor: E,
        username: &str,
        except_id: Option<i64>,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = ? AND id IS NOT ?)",
        )
        .bind(username)
        .bind(except_id)
        .fetch_one(executor)
        .await?;

        Ok(taken)
    }

    /// Checks whether `email` belongs to a user other than `except_id`
    pub async fn email_taken<'e, E>(
        executor: E,
        email: &str,
        except_id: Option<i64>,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = ? AND id IS NOT ?)",
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(executor)
        .await?;

        Ok(taken)
    }

    /// Replaces username, email and password of an existing user
    ///
    /// # Returns
    ///
    /// The updated user, or None if no user has this ID
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET username = ?, email = ?, password = ?, updated_at = ?
             WHERE id = ?
             RETURNING {USER_COLUMNS}"
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.password)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Deletes a user
    ///
    /// Todos and team memberships go with the user. Fails with a foreign key
    /// violation while the user still owns a team, project or sprint.
    ///
    /// # Returns
    ///
    /// True if a user was deleted, false if not found
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether the user owns any team, project or sprint
    pub async fn owns_anything<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let owns: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM teams WHERE current_user_id = ?1)
                 OR EXISTS (SELECT 1 FROM projects WHERE current_user_id = ?1)
                 OR EXISTS (SELECT 1 FROM sprints WHERE current_user_id = ?1)",
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(owns)
    }

    /// Lists users with pagination, oldest first
    pub async fn list<'e, E>(executor: E, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_hides_password() {
        let user = User {
            id: 1,
            username: "mari".to_string(),
            email: "mari@example.com".to_string(),
            password: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "mari");
    }

    #[test]
    fn test_user_public_from_user() {
        let user = User {
            id: 7,
            username: "bia".to_string(),
            email: "bia@example.com".to_string(),
            password: "hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public = UserPublic::from(user);
        assert_eq!(
            public,
            UserPublic {
                id: 7,
                username: "bia".to_string(),
                email: "bia@example.com".to_string(),
            }
        );
    }

    // Database-backed tests live in tests/users_tests.rs
}
