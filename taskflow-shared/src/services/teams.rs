/// Team membership engine
///
/// Creates, lists, updates and deletes teams. The member set of a team is
/// always replaced as a whole from a list of usernames; only the owner may
/// mutate or delete a team.
///
/// # Error precedence
///
/// - create: empty list (422) → unresolved usernames (404) → name taken (409)
/// - update: team missing (404) → not owner (403) → empty list (422) →
///   unresolved usernames (404) → name held by another team (409)
/// - delete: team missing (404) → not owner (403)
///
/// Every check runs before the first write, inside the same transaction.

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::membership::{dedupe, require_all_resolved, require_non_empty};
use crate::db::pool::begin_write;
use crate::error::{DomainError, DomainResult};
use crate::models::team::{CreateTeam, Team, TeamPublic};
use crate::models::user::User;

pub const USERS_NOT_FOUND: &str = "One or more users do not exist";
pub const TEAM_ALREADY_CREATED: &str = "Team already created";
pub const TEAM_NAME_IN_USE: &str = "Team name already in use";
pub const TEAM_NOT_FOUND: &str = "Team not found";

/// Field reported when the member list is empty
const MEMBER_FIELD: &str = "user_list";

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub team_name: String,
    pub usernames: Vec<String>,
}

/// Changes to a team; `None` leaves that part untouched
#[derive(Debug, Clone, Default)]
pub struct TeamChanges {
    pub team_name: Option<String>,
    pub usernames: Option<Vec<String>>,
}

/// Resolves a member list to user IDs, all or nothing
async fn resolve_members(
    conn: &mut sqlx::SqliteConnection,
    usernames: &[String],
) -> DomainResult<Vec<i64>> {
    require_non_empty(usernames, MEMBER_FIELD)?;

    let requested = dedupe(usernames);
    let users = User::find_by_usernames(&mut *conn, &requested).await?;
    require_all_resolved(&requested, &users, USERS_NOT_FOUND)?;

    Ok(users.into_iter().map(|user| user.id).collect())
}

/// Loads a team the caller owns
async fn owned_team(
    conn: &mut sqlx::SqliteConnection,
    team_id: i64,
    caller_id: i64,
) -> DomainResult<Team> {
    let team = Team::find_by_id(&mut *conn, team_id)
        .await?
        .ok_or_else(|| DomainError::not_found(TEAM_NOT_FOUND))?;

    if team.current_user_id != caller_id {
        return Err(DomainError::forbidden());
    }

    Ok(team)
}

/// Creates a team owned by `owner_id` whose members are exactly the
/// resolved usernames
pub async fn create_team(pool: &SqlitePool, owner_id: i64, input: NewTeam) -> DomainResult<TeamPublic> {
    let mut tx = begin_write(pool).await?;

    let member_ids = resolve_members(&mut tx, &input.usernames).await?;

    if Team::name_taken(&mut *tx, &input.team_name, None).await? {
        return Err(DomainError::conflict(TEAM_ALREADY_CREATED));
    }

    let team = Team::create(
        &mut *tx,
        CreateTeam {
            team_name: input.team_name,
            current_user_id: owner_id,
        },
    )
    .await
    .map_err(|e| DomainError::from_write(e, TEAM_ALREADY_CREATED))?;

    Team::replace_members(&mut tx, team.id, &member_ids).await?;

    let public = team.to_public(&mut tx).await?;
    tx.commit().await?;

    info!(
        team_id = public.id,
        team_name = %public.team_name,
        owner_id,
        members = public.users.len(),
        "Team created"
    );
    Ok(public)
}

/// Lists teams whose name contains `name_filter`; no match is an empty list
pub async fn list_teams(pool: &SqlitePool, name_filter: Option<&str>) -> DomainResult<Vec<TeamPublic>> {
    let mut tx = pool.begin().await?;

    let teams = Team::list(&mut *tx, name_filter).await?;

    let mut public = Vec::with_capacity(teams.len());
    for team in teams {
        public.push(team.to_public(&mut tx).await?);
    }

    tx.commit().await?;

    debug!(count = public.len(), filter = ?name_filter, "Listed teams");
    Ok(public)
}

pub async fn get_team(pool: &SqlitePool, team_id: i64) -> DomainResult<TeamPublic> {
    let mut tx = pool.begin().await?;

    let team = Team::find_by_id(&mut *tx, team_id)
        .await?
        .ok_or_else(|| DomainError::not_found(TEAM_NOT_FOUND))?;
    let public = team.to_public(&mut tx).await?;

    tx.commit().await?;
    Ok(public)
}

/// Renames a team and/or replaces its member set
pub async fn update_team(
    pool: &SqlitePool,
    caller_id: i64,
    team_id: i64,
    changes: TeamChanges,
) -> DomainResult<TeamPublic> {
    let mut tx = begin_write(pool).await?;

    let mut team = owned_team(&mut tx, team_id, caller_id).await?;

    let member_ids = match &changes.usernames {
        Some(usernames) => Some(resolve_members(&mut tx, usernames).await?),
        None => None,
    };

    if let Some(team_name) = &changes.team_name {
        if Team::name_taken(&mut *tx, team_name, Some(team_id)).await? {
            return Err(DomainError::conflict(TEAM_NAME_IN_USE));
        }

        team = Team::rename(&mut *tx, team_id, team_name)
            .await
            .map_err(|e| DomainError::from_write(e, TEAM_NAME_IN_USE))?
            .ok_or_else(|| DomainError::not_found(TEAM_NOT_FOUND))?;
    }

    if let Some(member_ids) = &member_ids {
        Team::replace_members(&mut tx, team_id, member_ids).await?;
        if changes.team_name.is_none() {
            Team::touch(&mut *tx, team_id).await?;
        }
    }

    let public = team.to_public(&mut tx).await?;
    tx.commit().await?;

    info!(
        team_id,
        renamed = changes.team_name.is_some(),
        members_replaced = member_ids.is_some(),
        "Team updated"
    );
    Ok(public)
}

/// Deletes a team; its member users and the projects it belonged to remain
pub async fn delete_team(pool: &SqlitePool, caller_id: i64, team_id: i64) -> DomainResult<()> {
    let mut tx = begin_write(pool).await?;

    owned_team(&mut tx, team_id, caller_id).await?;
    Team::delete(&mut *tx, team_id).await?;

    tx.commit().await?;

    info!(team_id, "Team deleted");
    Ok(())
}
