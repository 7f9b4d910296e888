use sqlx::{SqliteExecutor, prelude::FromRow};

use crate::models::{
    registration::{Participant, Registration, RegistrationStatus},
    tournament::TournamentStatus,
};

pub async fn create_registration<'e>(
    executor: impl SqliteExecutor<'e>,
    tournament_id: i64,
    participant: Participant,
    now: i64,
) -> sqlx::Result<Registration> {
    sqlx::query_as(
        "insert into registrations (tournament_id, player_id, team_id, status, registered_at)
            values (?1, ?2, ?3, ?4, ?5)
            returning *",
    )
    .bind(tournament_id)
    .bind(participant.player_id())
    .bind(participant.team_id())
    .bind(RegistrationStatus::Pending)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn find_participant_registration<'e>(
    executor: impl SqliteExecutor<'e>,
    tournament_id: i64,
    participant: Participant,
) -> sqlx::Result<Option<Registration>> {
    sqlx::query_as(
        "select * from registrations
            where tournament_id = ?1
              and (player_id = ?2 or team_id = ?3)
            limit 1",
    )
    .bind(tournament_id)
    .bind(participant.player_id())
    .bind(participant.team_id())
    .fetch_optional(executor)
    .await
}

pub async fn count_registrations<'e>(
    executor: impl SqliteExecutor<'e>,
    tournament_id: i64,
    statuses: &[RegistrationStatus],
) -> sqlx::Result<i64> {
    let placeholders = vec!["?"; statuses.len()].join(", ");
    let sql = format!(
        "select count(*) from registrations where tournament_id = ? and status in ({})",
        placeholders
    );
    let mut query = sqlx::query_scalar(&sql).bind(tournament_id);
    for status in statuses {
        query = query.bind(*status);
    }
    query.fetch_one(executor).await
}

pub async fn get_registration<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<Registration>> {
    sqlx::query_as("select * from registrations where id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn update_registration_status<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    status: RegistrationStatus,
    confirmed_at: Option<i64>,
) -> sqlx::Result<Registration> {
    sqlx::query_as(
        "update registrations set
            status = ?1,
            confirmed_at = coalesce(?2, confirmed_at)
        where id = ?3
        returning *",
    )
    .bind(status)
    .bind(confirmed_at)
    .bind(id)
    .fetch_one(executor)
    .await
}

pub async fn delete_registration<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<u64> {
    let result = sqlx::query("delete from registrations where id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn team_has_registration_with_status<'e>(
    executor: impl SqliteExecutor<'e>,
    team_id: i64,
    statuses: &[TournamentStatus],
) -> sqlx::Result<bool> {
    let placeholders = vec!["?"; statuses.len()].join(", ");
    let sql = format!(
        "select exists(
            select 1 from registrations r
            inner join tournaments t on t.id = r.tournament_id
            where r.team_id = ? and t.status in ({})
        )",
        placeholders
    );
    let mut query = sqlx::query_scalar(&sql).bind(team_id);
    for status in statuses {
        query = query.bind(*status);
    }
    query.fetch_one(executor).await
}

#[derive(FromRow)]
pub struct DbRegistration {
    pub id: i64,
    pub tournament_id: i64,
    pub player_id: Option<i64>,
    pub team_id: Option<i64>,
    pub status: RegistrationStatus,
    pub registered_at: i64,
    pub confirmed_at: Option<i64>,
    pub player_username: Option<String>,
    pub team_name: Option<String>,
    pub team_tag: Option<String>,
}

pub async fn select_registrations<'e>(
    executor: impl SqliteExecutor<'e>,
    tournament_id: i64,
) -> sqlx::Result<Vec<DbRegistration>> {
    sqlx::query_as(
        "select
            r.id,
            r.tournament_id,
            r.player_id,
            r.team_id,
            r.status,
            r.registered_at,
            r.confirmed_at,
            u.username as player_username,
            t.name as team_name,
            t.tag as team_tag
        from registrations r
        left join users u on r.player_id = u.id
        left join teams t on r.team_id = t.id
        where r.tournament_id = ?1
        order by r.registered_at asc, r.id asc",
    )
    .bind(tournament_id)
    .fetch_all(executor)
    .await
}
