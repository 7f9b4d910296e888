use itertools::Itertools;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    clock::Clock,
    errors::AppError,
    models::{
        team::{Team, TeamDetails, TeamMember, validate_team_name, validate_team_tag},
        tournament::TournamentStatus,
    },
    payloads::{NewTeam, TeamChanges},
    repositories::{self, auth_repo, registration_repo, team_repo},
};

async fn find_team(conn: &mut SqliteConnection, id: i64) -> Result<Team, AppError> {
    team_repo::get_team(conn, id)
        .await?
        .ok_or(AppError::TeamNotFound(id))
}

async fn details(conn: &mut SqliteConnection, team: Team) -> Result<TeamDetails, AppError> {
    let members = team_repo::select_members(conn, team.id)
        .await?
        .into_iter()
        .map(TeamMember::from)
        .collect();
    Ok(TeamDetails { team, members })
}

/// The creator becomes captain and first member.
pub async fn create_team(
    pool: &SqlitePool,
    clock: &dyn Clock,
    captain_id: i64,
    payload: NewTeam,
) -> Result<TeamDetails, AppError> {
    validate_team_name(&payload.name)?;
    validate_team_tag(&payload.tag)?;
    let now = clock.timestamp();
    let mut tx = repositories::begin_write(pool).await?;
    let team =
        team_repo::create_team(&mut *tx, captain_id, payload.name.trim(), &payload.tag, now)
            .await?;
    team_repo::add_member(&mut *tx, team.id, captain_id, now).await?;
    let details = details(&mut tx, team).await?;
    tx.commit().await?;
    tracing::info!(
        "team {} [{}] created by {}",
        details.team.id,
        details.team.tag,
        captain_id
    );
    Ok(details)
}

pub async fn get_team(pool: &SqlitePool, id: i64) -> Result<TeamDetails, AppError> {
    let mut conn = pool.acquire().await?;
    let team = find_team(&mut conn, id).await?;
    details(&mut conn, team).await
}

pub async fn list_teams(pool: &SqlitePool) -> Result<Vec<TeamDetails>, AppError> {
    let teams = team_repo::list_teams(pool).await?;
    let mut members = team_repo::select_all_members(pool)
        .await?
        .into_iter()
        .into_group_map_by(|member| member.team_id);
    Ok(teams
        .into_iter()
        .map(|team| {
            let members = members
                .remove(&team.id)
                .unwrap_or_default()
                .into_iter()
                .map(TeamMember::from)
                .collect();
            TeamDetails { team, members }
        })
        .collect())
}

pub async fn update_team(
    pool: &SqlitePool,
    id: i64,
    requester_id: i64,
    changes: TeamChanges,
) -> Result<TeamDetails, AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    let current = find_team(&mut tx, id).await?;
    current.ensure_captain(requester_id)?;
    let updated = Team {
        name: changes
            .name
            .map(|name| name.trim().to_string())
            .unwrap_or(current.name),
        tag: changes.tag.unwrap_or(current.tag),
        ..current
    };
    validate_team_name(&updated.name)?;
    validate_team_tag(&updated.tag)?;
    let team = team_repo::update_team(&mut *tx, &updated).await?;
    let details = details(&mut tx, team).await?;
    tx.commit().await?;
    Ok(details)
}

pub async fn remove_team(pool: &SqlitePool, id: i64, requester_id: i64) -> Result<(), AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    let team = find_team(&mut tx, id).await?;
    team.ensure_captain(requester_id)?;
    if registration_repo::team_has_registration_with_status(
        &mut *tx,
        id,
        &TournamentStatus::ACTIVE,
    )
    .await?
    {
        return Err(AppError::TeamInActiveTournament(id));
    }
    team_repo::delete_team(&mut *tx, id).await?;
    tx.commit().await?;
    tracing::info!("team {} deleted by its captain", id);
    Ok(())
}

pub async fn add_member(
    pool: &SqlitePool,
    clock: &dyn Clock,
    id: i64,
    requester_id: i64,
    user_id: i64,
) -> Result<TeamDetails, AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    let team = find_team(&mut tx, id).await?;
    team.ensure_captain(requester_id)?;
    if auth_repo::get_user(&mut *tx, user_id).await?.is_none() {
        return Err(AppError::UserNotFound(user_id));
    }
    if team.is_captain(user_id) || team_repo::is_member(&mut *tx, id, user_id).await? {
        return Err(AppError::AlreadyTeamMember(user_id));
    }
    team_repo::add_member(&mut *tx, id, user_id, clock.timestamp()).await?;
    let details = details(&mut tx, team).await?;
    tx.commit().await?;
    Ok(details)
}

pub async fn remove_member(
    pool: &SqlitePool,
    id: i64,
    requester_id: i64,
    user_id: i64,
) -> Result<TeamDetails, AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    let team = find_team(&mut tx, id).await?;
    team.ensure_captain(requester_id)?;
    if team.is_captain(user_id) {
        return Err(AppError::CannotRemoveCaptain);
    }
    if team_repo::remove_member(&mut *tx, id, user_id).await? == 0 {
        return Err(AppError::NotTeamMember(user_id));
    }
    let details = details(&mut tx, team).await?;
    tx.commit().await?;
    Ok(details)
}
