use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    clock::Clock,
    errors::AppError,
    models::{
        registration::RegistrationStatus,
        tournament::{Tournament, TournamentDetails, TournamentStatus},
    },
    pagination::LimitOffset,
    payloads::{NewTournament, TournamentChanges, TournamentFilter},
    repositories::{self, registration_repo, tournament_repo},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentPage {
    pub data: Vec<Tournament>,
    pub total: i64,
    pub page: i64,
}

/// New tournaments always start as drafts.
pub async fn create_tournament(
    pool: &SqlitePool,
    clock: &dyn Clock,
    organizer_id: i64,
    payload: NewTournament,
) -> Result<Tournament, AppError> {
    let now = clock.timestamp();
    TournamentDetails {
        name: &payload.name,
        game: &payload.game,
        max_participants: payload.max_participants,
        prize_pool: payload.prize_pool,
        start_date: payload.start_date,
        end_date: payload.end_date,
    }
    .validate(now, true)?;
    let tournament = tournament_repo::create_tournament(pool, organizer_id, &payload, now).await?;
    tracing::info!(
        "tournament {} ({}) created by organizer {}",
        tournament.id,
        tournament.name,
        organizer_id
    );
    Ok(tournament)
}

pub async fn get_tournament(pool: &SqlitePool, id: i64) -> Result<Tournament, AppError> {
    tournament_repo::get_tournament(pool, id)
        .await?
        .ok_or(AppError::TournamentNotFound(id))
}

pub async fn list_tournaments(
    pool: &SqlitePool,
    filter: TournamentFilter,
) -> Result<TournamentPage, AppError> {
    let (page, window) = LimitOffset::from_page(filter.page, filter.limit);
    let total = tournament_repo::count_tournaments(pool, &filter).await?;
    let data = tournament_repo::list_tournaments(pool, &filter, window).await?;
    Ok(TournamentPage { data, total, page })
}

pub async fn update_tournament(
    pool: &SqlitePool,
    clock: &dyn Clock,
    id: i64,
    changes: TournamentChanges,
) -> Result<Tournament, AppError> {
    let now = clock.timestamp();
    let mut tx = repositories::begin_write(pool).await?;
    let current = tournament_repo::get_tournament(&mut *tx, id)
        .await?
        .ok_or(AppError::TournamentNotFound(id))?;
    if current.status.is_terminal() {
        return Err(AppError::TournamentLocked(id));
    }
    let start_date_changed = changes
        .start_date
        .is_some_and(|start| start != current.start_date);
    let updated = Tournament {
        name: changes
            .name
            .map(|name| name.trim().to_string())
            .unwrap_or(current.name),
        game: changes
            .game
            .map(|game| game.trim().to_string())
            .unwrap_or(current.game),
        format: changes.format.unwrap_or(current.format),
        max_participants: changes.max_participants.unwrap_or(current.max_participants),
        prize_pool: changes.prize_pool.or(current.prize_pool),
        start_date: changes.start_date.unwrap_or(current.start_date),
        end_date: changes.end_date.or(current.end_date),
        ..current
    };
    TournamentDetails {
        name: &updated.name,
        game: &updated.game,
        max_participants: updated.max_participants,
        prize_pool: updated.prize_pool,
        start_date: updated.start_date,
        end_date: updated.end_date,
    }
    .validate(now, start_date_changed)?;
    let tournament = tournament_repo::update_tournament(&mut *tx, &updated, now).await?;
    tx.commit().await?;
    Ok(tournament)
}

pub async fn remove_tournament(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    if tournament_repo::get_tournament(&mut *tx, id).await?.is_none() {
        return Err(AppError::TournamentNotFound(id));
    }
    let confirmed =
        registration_repo::count_registrations(&mut *tx, id, &[RegistrationStatus::Confirmed])
            .await?;
    if confirmed > 0 {
        tracing::warn!(
            "refusing to delete tournament {} with {} confirmed registrations",
            id,
            confirmed
        );
        return Err(AppError::TournamentHasConfirmedRegistrations(id));
    }
    tournament_repo::delete_tournament(&mut *tx, id).await?;
    tx.commit().await?;
    tracing::info!("tournament {} deleted", id);
    Ok(())
}

/// Any status is accepted except opening a tournament whose start has passed.
pub async fn update_tournament_status(
    pool: &SqlitePool,
    clock: &dyn Clock,
    id: i64,
    status: TournamentStatus,
) -> Result<Tournament, AppError> {
    let now = clock.timestamp();
    let mut tx = repositories::begin_write(pool).await?;
    let current = tournament_repo::get_tournament(&mut *tx, id)
        .await?
        .ok_or(AppError::TournamentNotFound(id))?;
    if status == TournamentStatus::Open && current.has_started(now) {
        return Err(AppError::CannotOpenPastTournament);
    }
    let tournament = tournament_repo::update_tournament_status(&mut *tx, id, status, now).await?;
    tx.commit().await?;
    tracing::info!(
        "tournament {} moved from {} to {}",
        id,
        current.status,
        tournament.status
    );
    Ok(tournament)
}

#[cfg(test)]
mod tests {
    use crate::{clock::FixedClock, models::tournament::TournamentFormat};

    use super::*;

    const NOW: i64 = 1_800_000_000;

    fn new_tournament(start_date: i64) -> NewTournament {
        NewTournament {
            name: "Frag Night".to_string(),
            game: "Quake III".to_string(),
            format: TournamentFormat::Solo,
            max_participants: 16,
            prize_pool: Some(0.0),
            start_date,
            end_date: None,
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_tournament_is_draft(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        let tournament = create_tournament(&pool, &clock, 2, new_tournament(NOW + 3600))
            .await
            .expect("failed to create tournament");
        assert_eq!(tournament.status, TournamentStatus::Draft);
        assert_eq!(tournament.organizer_id, 2);

        let past = create_tournament(&pool, &clock, 2, new_tournament(NOW)).await;
        assert!(matches!(past, Err(AppError::StartDateNotInFuture)));
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "tournaments")))]
    async fn test_open_requires_future_start(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        let late = update_tournament_status(&pool, &clock, 7, TournamentStatus::Open).await;
        assert!(matches!(late, Err(AppError::CannotOpenPastTournament)));
        let unchanged = get_tournament(&pool, 7).await.expect("tournament exists");
        assert_eq!(unchanged.status, TournamentStatus::Draft);

        let opened = update_tournament_status(&pool, &clock, 3, TournamentStatus::Open)
            .await
            .expect("failed to open tournament");
        assert_eq!(opened.status, TournamentStatus::Open);
        assert_eq!(opened.updated_at, NOW);
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "tournaments")))]
    async fn test_other_status_moves_are_not_guarded(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        let rewound = update_tournament_status(&pool, &clock, 4, TournamentStatus::Draft)
            .await
            .expect("ONGOING -> DRAFT is accepted");
        assert_eq!(rewound.status, TournamentStatus::Draft);
        let revived = update_tournament_status(&pool, &clock, 5, TournamentStatus::Ongoing)
            .await
            .expect("COMPLETED -> ONGOING is accepted");
        assert_eq!(revived.status, TournamentStatus::Ongoing);
        let missing =
            update_tournament_status(&pool, &clock, 99, TournamentStatus::Cancelled).await;
        assert!(matches!(missing, Err(AppError::TournamentNotFound(99))));
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "tournaments")))]
    async fn test_terminal_tournaments_are_locked(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        let changes = || TournamentChanges {
            name: Some("Renamed Cup".to_string()),
            ..Default::default()
        };
        let locked = update_tournament(&pool, &clock, 5, changes()).await;
        assert!(matches!(locked, Err(AppError::TournamentLocked(5))));
        let locked = update_tournament(&pool, &clock, 8, changes()).await;
        assert!(matches!(locked, Err(AppError::TournamentLocked(8))));

        let renamed = update_tournament(&pool, &clock, 4, changes())
            .await
            .expect("ongoing tournaments stay editable");
        assert_eq!(renamed.name, "Renamed Cup");
        assert_eq!(renamed.start_date, 1_700_000_000);
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "tournaments")))]
    async fn test_update_validates_merged_dates(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        let moved_to_past = update_tournament(
            &pool,
            &clock,
            3,
            TournamentChanges {
                start_date: Some(NOW - 1),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(moved_to_past, Err(AppError::StartDateNotInFuture)));
        let inverted = update_tournament(
            &pool,
            &clock,
            1,
            TournamentChanges {
                start_date: Some(1_900_100_000),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(inverted, Err(AppError::EndDateBeforeStart)));
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("users", "tournaments", "teams", "registrations")
    ))]
    async fn test_remove_requires_no_confirmed_registrations(pool: SqlitePool) {
        let blocked = remove_tournament(&pool, 5).await;
        assert!(matches!(
            blocked,
            Err(AppError::TournamentHasConfirmedRegistrations(5))
        ));
        remove_tournament(&pool, 1)
            .await
            .expect("pending registrations do not block deletion");
        assert!(matches!(
            get_tournament(&pool, 1).await,
            Err(AppError::TournamentNotFound(1))
        ));
        let orphaned = registration_repo::get_registration(&pool, 4)
            .await
            .expect("failed to query registration");
        assert!(orphaned.is_none());
        assert!(matches!(
            remove_tournament(&pool, 1).await,
            Err(AppError::TournamentNotFound(1))
        ));
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "tournaments")))]
    async fn test_list_tournaments_pages(pool: SqlitePool) {
        let first = list_tournaments(
            &pool,
            TournamentFilter {
                limit: Some(3),
                ..Default::default()
            },
        )
        .await
        .expect("failed to list tournaments");
        assert_eq!(first.total, 8);
        assert_eq!(first.page, 1);
        assert_eq!(first.data.len(), 3);
        assert!(
            first
                .data
                .windows(2)
                .all(|pair| pair[0].start_date <= pair[1].start_date)
        );
        let quake = list_tournaments(
            &pool,
            TournamentFilter {
                game: Some("Quake III".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("failed to list tournaments");
        assert_eq!(quake.total, 2);
    }
}
