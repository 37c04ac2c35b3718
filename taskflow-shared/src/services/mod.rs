/// Domain engines
///
/// Each engine owns the business rules of one resource and runs every
/// operation against the pool it is given, inside one transaction where the
/// operation touches more than one statement. Failures are reported as
/// [`DomainError`](crate::error::DomainError).
///
/// - `users`: user directory (uniqueness, self-service update and delete)
/// - `teams`: team membership engine
/// - `projects`: project membership engine
/// - `sprints`: sprint register
/// - `todos`: per-user todo store
/// - `membership`: member-list rules shared by teams and projects

pub mod membership;
pub mod projects;
pub mod sprints;
pub mod teams;
pub mod todos;
pub mod users;
