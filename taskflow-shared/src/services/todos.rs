/// Todo store
///
/// Todos are strictly per-user. A todo that exists but belongs to another
/// user is reported exactly like a missing one.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DomainError, DomainResult};
use crate::models::todo::{CreateTodo, Todo, TodoFilter, TodoState, UpdateTodo};

pub const TODO_NOT_FOUND: &str = "Todo not found";

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub state: TodoState,
}

pub async fn create_todo(pool: &SqlitePool, owner_id: i64, input: NewTodo) -> DomainResult<Todo> {
    let todo = Todo::create(
        pool,
        CreateTodo {
            title: input.title,
            description: input.description,
            state: input.state,
            user_id: owner_id,
        },
    )
    .await?;

    info!(todo_id = todo.id, owner_id, state = %todo.state, "Todo created");
    Ok(todo)
}

/// Lists the caller's todos matching every filter in `filter`
pub async fn list_todos(pool: &SqlitePool, owner_id: i64, filter: &TodoFilter) -> DomainResult<Vec<Todo>> {
    if filter.limit < 0 {
        return Err(DomainError::validation("limit", "Must not be negative"));
    }
    if filter.offset < 0 {
        return Err(DomainError::validation("offset", "Must not be negative"));
    }

    let todos = Todo::list(pool, owner_id, filter).await?;

    debug!(count = todos.len(), owner_id, "Listed todos");
    Ok(todos)
}

/// Applies the fields present in `changes` to one of the caller's todos
pub async fn update_todo(
    pool: &SqlitePool,
    owner_id: i64,
    todo_id: i64,
    changes: UpdateTodo,
) -> DomainResult<Todo> {
    let todo = Todo::update(pool, todo_id, owner_id, changes)
        .await?
        .ok_or_else(|| DomainError::not_found(TODO_NOT_FOUND))?;

    info!(todo_id, owner_id, "Todo updated");
    Ok(todo)
}

pub async fn delete_todo(pool: &SqlitePool, owner_id: i64, todo_id: i64) -> DomainResult<()> {
    if !Todo::delete(pool, todo_id, owner_id).await? {
        return Err(DomainError::not_found(TODO_NOT_FOUND));
    }

    info!(todo_id, owner_id, "Todo deleted");
    Ok(())
}
