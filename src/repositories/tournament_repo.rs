use sqlx::SqliteExecutor;

use crate::{
    models::tournament::{Tournament, TournamentStatus},
    pagination::LimitOffset,
    payloads::{NewTournament, TournamentFilter},
};

pub async fn create_tournament<'e>(
    executor: impl SqliteExecutor<'e>,
    organizer_id: i64,
    payload: &NewTournament,
    now: i64,
) -> sqlx::Result<Tournament> {
    sqlx::query_as(
        "insert into tournaments
            (name, game, format, max_participants, prize_pool, start_date, end_date, status,
                organizer_id, created_at, updated_at)
            values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            returning *",
    )
    .bind(payload.name.trim())
    .bind(payload.game.trim())
    .bind(payload.format)
    .bind(payload.max_participants)
    .bind(payload.prize_pool)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(TournamentStatus::Draft)
    .bind(organizer_id)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn get_tournament<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<Tournament>> {
    sqlx::query_as("select * from tournaments where id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn update_tournament<'e>(
    executor: impl SqliteExecutor<'e>,
    tournament: &Tournament,
    now: i64,
) -> sqlx::Result<Tournament> {
    sqlx::query_as(
        "update tournaments set
            name = ?1,
            game = ?2,
            format = ?3,
            max_participants = ?4,
            prize_pool = ?5,
            start_date = ?6,
            end_date = ?7,
            updated_at = ?8
        where id = ?9
        returning *",
    )
    .bind(&tournament.name)
    .bind(&tournament.game)
    .bind(tournament.format)
    .bind(tournament.max_participants)
    .bind(tournament.prize_pool)
    .bind(tournament.start_date)
    .bind(tournament.end_date)
    .bind(now)
    .bind(tournament.id)
    .fetch_one(executor)
    .await
}

pub async fn update_tournament_status<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    status: TournamentStatus,
    now: i64,
) -> sqlx::Result<Tournament> {
    sqlx::query_as("update tournaments set status = ?1, updated_at = ?2 where id = ?3 returning *")
        .bind(status)
        .bind(now)
        .bind(id)
        .fetch_one(executor)
        .await
}

pub async fn delete_tournament<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<u64> {
    let result = sqlx::query("delete from tournaments where id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_tournaments<'e>(
    executor: impl SqliteExecutor<'e>,
    filter: &TournamentFilter,
    page: LimitOffset,
) -> sqlx::Result<Vec<Tournament>> {
    sqlx::query_as(
        "select * from tournaments
            where (?1 is null or status = ?1)
              and (?2 is null or game = ?2)
              and (?3 is null or format = ?3)
            order by start_date asc
            limit ?4 offset ?5",
    )
    .bind(filter.status)
    .bind(filter.game.as_deref())
    .bind(filter.format)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

pub async fn count_tournaments<'e>(
    executor: impl SqliteExecutor<'e>,
    filter: &TournamentFilter,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "select count(*) from tournaments
            where (?1 is null or status = ?1)
              and (?2 is null or game = ?2)
              and (?3 is null or format = ?3)",
    )
    .bind(filter.status)
    .bind(filter.game.as_deref())
    .bind(filter.format)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
mod tests {
    use crate::models::tournament::TournamentFormat;

    use super::*;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_tournament_starts_as_draft(pool: sqlx::SqlitePool) {
        let payload = NewTournament {
            name: "  Rocket Cup ".to_string(),
            game: "Rocket League".to_string(),
            format: TournamentFormat::Team,
            max_participants: 8,
            prize_pool: None,
            start_date: 1_900_000_000,
            end_date: None,
        };
        let tournament = create_tournament(&pool, 2, &payload, 1_800_000_000)
            .await
            .expect("failed to create tournament");
        assert_eq!(tournament.status, TournamentStatus::Draft);
        assert_eq!(tournament.name, "Rocket Cup");
        assert_eq!(tournament.organizer_id, 2);
        assert_eq!(tournament.updated_at, 1_800_000_000);
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "tournaments")))]
    async fn test_list_tournaments_filters(pool: sqlx::SqlitePool) {
        let filter = TournamentFilter {
            status: Some(TournamentStatus::Open),
            format: Some(TournamentFormat::Solo),
            ..Default::default()
        };
        let open_solo = list_tournaments(&pool, &filter, LimitOffset::default())
            .await
            .expect("failed to list tournaments");
        assert!(!open_solo.is_empty());
        assert!(
            open_solo
                .iter()
                .all(|t| t.status == TournamentStatus::Open && t.format == TournamentFormat::Solo)
        );
        let total = count_tournaments(&pool, &filter)
            .await
            .expect("failed to count tournaments");
        assert_eq!(total as usize, open_solo.len());
    }
}
