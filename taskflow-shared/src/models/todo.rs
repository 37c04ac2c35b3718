/// Todo model and database operations
///
/// Todos are private to their owner: every lookup is scoped by `user_id`, so
/// a todo owned by someone else is indistinguishable from a missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     state TEXT NOT NULL,   -- draft | todo | doing | done | trash
///     user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite};

const TODO_COLUMNS: &str = "id, title, description, state, user_id, created_at, updated_at";

/// Default page size for todo listings
pub const DEFAULT_TODO_LIMIT: i64 = 100;

/// Todo workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TodoState {
    Draft,
    Todo,
    Doing,
    Done,
    Trash,
}

impl TodoState {
    pub const ALL: [TodoState; 5] = [
        TodoState::Draft,
        TodoState::Todo,
        TodoState::Doing,
        TodoState::Done,
        TodoState::Trash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoState::Draft => "draft",
            TodoState::Todo => "todo",
            TodoState::Doing => "doing",
            TodoState::Done => "done",
            TodoState::Trash => "trash",
        }
    }
}

impl fmt::Display for TodoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TodoState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid state '{}', expected one of: draft, todo, doing, done, trash",
                    s
                )
            })
    }
}

/// Todo row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub state: TodoState,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
    pub state: TodoState,
    pub user_id: i64,
}

/// Partial update: only `Some` fields are written
#[derive(Debug, Clone, Default)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
}

/// List filters, AND-combined
#[derive(Debug, Clone)]
pub struct TodoFilter {
    /// Substring of the title
    pub title: Option<String>,

    /// Substring of the description
    pub description: Option<String>,

    /// Exact state
    pub state: Option<TodoState>,

    pub offset: i64,
    pub limit: i64,
}

impl Default for TodoFilter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            state: None,
            offset: 0,
            limit: DEFAULT_TODO_LIMIT,
        }
    }
}

impl Todo {
    pub async fn create<'e, E>(executor: E, data: CreateTodo) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();

        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, description, state, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.state)
        .bind(data.user_id)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(todo)
    }

    /// Lists the todos of one user matching every given filter
    pub async fn list<'e, E>(
        executor: E,
        user_id: i64,
        filter: &TodoFilter,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {TODO_COLUMNS} FROM todos WHERE user_id = "));
        builder.push_bind(user_id);

        if let Some(title) = &filter.title {
            builder.push(" AND instr(title, ").push_bind(title).push(") > 0");
        }
        if let Some(description) = &filter.description {
            builder
                .push(" AND instr(description, ")
                .push_bind(description)
                .push(") > 0");
        }
        if let Some(state) = filter.state {
            builder.push(" AND state = ").push_bind(state);
        }

        builder
            .push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let todos = builder.build_query_as::<Todo>().fetch_all(executor).await?;

        Ok(todos)
    }

    /// Applies a partial update to a todo owned by `user_id`
    ///
    /// # Returns
    ///
    /// The updated todo, or None if it doesn't exist or belongs to someone else
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        user_id: i64,
        data: UpdateTodo,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos
             SET title = COALESCE(?, title),
                 description = COALESCE(?, description),
                 state = COALESCE(?, state),
                 updated_at = ?
             WHERE id = ? AND user_id = ?
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.state)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(todo)
    }

    /// Deletes a todo owned by `user_id`
    pub async fn delete<'e, E>(executor: E, id: i64, user_id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
