/// User directory
///
/// Creation is open; update and delete are self-service only. Username and
/// email uniqueness is pre-checked inside the write transaction and finally
/// guaranteed by the unique indexes.
///
/// # Deletion policy
///
/// A user who still owns a team, project or sprint cannot be deleted
/// (`Conflict`). Otherwise their todos are deleted with them and they drop
/// out of every team they were a member of.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::auth::password::{hash_password, PasswordPolicy};
use crate::db::pool::begin_write;
use crate::error::{DomainError, DomainResult};
use crate::models::user::{CreateUser, UpdateUser, User, UserPublic};

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const EMAIL_TAKEN: &str = "Email already exists";
pub const USER_NOT_FOUND: &str = "User not found";
pub const USER_OWNS_ENTITIES: &str =
    "User still owns teams, projects or sprints; delete or hand them over first";

/// Plaintext user input for create and full update
#[derive(Debug, Clone)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn check_password(policy: &PasswordPolicy, password: &str) -> DomainResult<()> {
    policy
        .validate(password)
        .map_err(|message| DomainError::validation("password", message))
}

/// Maps a unique violation back to the column that caused it
fn unique_conflict(err: sqlx::Error) -> DomainError {
    let detail = match &err {
        sqlx::Error::Database(db_err) if db_err.message().contains("users.email") => EMAIL_TAKEN,
        _ => USERNAME_TAKEN,
    };
    DomainError::from_write(err, detail)
}

/// Fails with `Conflict` if the username or email belongs to someone other
/// than `except_id`
async fn ensure_unique(
    conn: &mut sqlx::SqliteConnection,
    input: &UserInput,
    except_id: Option<i64>,
) -> DomainResult<()> {
    if User::username_taken(&mut *conn, &input.username, except_id).await? {
        return Err(DomainError::conflict(USERNAME_TAKEN));
    }
    if User::email_taken(&mut *conn, &input.email, except_id).await? {
        return Err(DomainError::conflict(EMAIL_TAKEN));
    }

    Ok(())
}

/// Registers a new user
///
/// # Errors
///
/// - `Validation` on `password` if it is shorter than the policy minimum
/// - `Conflict` if the username or email is taken
pub async fn create_user(
    pool: &SqlitePool,
    policy: &PasswordPolicy,
    input: UserInput,
) -> DomainResult<UserPublic> {
    check_password(policy, &input.password)?;

    let password = hash_password(&input.password)?;

    let mut tx = begin_write(pool).await?;

    ensure_unique(&mut tx, &input, None).await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            username: input.username,
            email: input.email,
            password,
        },
    )
    .await
    .map_err(unique_conflict)?;

    tx.commit().await?;

    info!(user_id = user.id, username = %user.username, "User created");
    Ok(user.into())
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> DomainResult<UserPublic> {
    let user = User::find_by_id(pool, id)
        .await?
        .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

    Ok(user.into())
}

pub async fn list_users(pool: &SqlitePool, limit: i64, offset: i64) -> DomainResult<Vec<UserPublic>> {
    let users = User::list(pool, limit, offset).await?;

    debug!(count = users.len(), limit, offset, "Listed users");
    Ok(users.into_iter().map(UserPublic::from).collect())
}

/// Replaces username, email and password of the caller's own account
///
/// Precedence: password policy → caller is target → target exists →
/// uniqueness against other users.
pub async fn update_user(
    pool: &SqlitePool,
    policy: &PasswordPolicy,
    caller_id: i64,
    target_id: i64,
    input: UserInput,
) -> DomainResult<UserPublic> {
    check_password(policy, &input.password)?;

    if caller_id != target_id {
        return Err(DomainError::forbidden());
    }

    let password = hash_password(&input.password)?;

    let mut tx = begin_write(pool).await?;

    if User::find_by_id(&mut *tx, target_id).await?.is_none() {
        return Err(DomainError::not_found(USER_NOT_FOUND));
    }

    ensure_unique(&mut tx, &input, Some(target_id)).await?;

    let user = User::update(
        &mut *tx,
        target_id,
        UpdateUser {
            username: input.username,
            email: input.email,
            password,
        },
    )
    .await
    .map_err(unique_conflict)?
    .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

    tx.commit().await?;

    info!(user_id = user.id, username = %user.username, "User updated");
    Ok(user.into())
}

/// Deletes the caller's own account
///
/// Precedence: caller is target → target exists → owns nothing.
pub async fn delete_user(pool: &SqlitePool, caller_id: i64, target_id: i64) -> DomainResult<()> {
    if caller_id != target_id {
        return Err(DomainError::forbidden());
    }

    let mut tx = begin_write(pool).await?;

    if User::find_by_id(&mut *tx, target_id).await?.is_none() {
        return Err(DomainError::not_found(USER_NOT_FOUND));
    }

    if User::owns_anything(&mut *tx, target_id).await? {
        return Err(DomainError::conflict(USER_OWNS_ENTITIES));
    }

    User::delete(&mut *tx, target_id)
        .await
        .map_err(|e| DomainError::from_delete(e, USER_OWNS_ENTITIES))?;

    tx.commit().await?;

    info!(user_id = target_id, "User deleted");
    Ok(())
}
