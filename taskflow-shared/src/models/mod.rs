/// Database models for Task Flow
///
/// This module contains all database models and their SQL operations. Every
/// operation takes a generic `sqlx::Executor`, so it runs equally against the
/// pool or inside a transaction; helpers that issue several statements take a
/// `&mut SqliteConnection` instead.
///
/// # Models
///
/// - `user`: User accounts
/// - `team`: Teams, their owner and their member users
/// - `project`: Projects, their owner and their member teams
/// - `sprint`: Dated iterations of a project
/// - `todo`: Per-user todo items
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::models::user::{User, CreateUser};
/// use taskflow_shared::db::pool::{begin_write, create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let mut tx = begin_write(&pool).await?;
/// let user = User::create(
///     &mut *tx,
///     CreateUser {
///         username: "mari".to_string(),
///         email: "mari@example.com".to_string(),
///         password: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod sprint;
pub mod team;
pub mod todo;
pub mod user;
