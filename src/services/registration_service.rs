use sqlx::SqlitePool;

use crate::{
    clock::Clock,
    errors::{self, AppError},
    models::{
        registration::{
            Participant, ParticipantDetails, Registration, RegistrationDetails,
            RegistrationStatus,
        },
        tournament::{TournamentFormat, TournamentStatus},
    },
    payloads::NewRegistration,
    repositories::{
        self, auth_repo,
        registration_repo::{self, DbRegistration},
        team_repo, tournament_repo,
    },
};

/// Registrations that count against a tournament's capacity.
const HOLDING_SEAT: [RegistrationStatus; 2] =
    [RegistrationStatus::Pending, RegistrationStatus::Confirmed];

pub async fn register(
    pool: &SqlitePool,
    clock: &dyn Clock,
    tournament_id: i64,
    payload: NewRegistration,
) -> Result<Registration, AppError> {
    let mut tx = repositories::begin_write(pool).await?;

    let tournament = tournament_repo::get_tournament(&mut *tx, tournament_id)
        .await?
        .ok_or(AppError::TournamentNotFound(tournament_id))?;
    if tournament.status != TournamentStatus::Open {
        return Err(AppError::TournamentNotOpen(tournament_id));
    }

    let participant = Participant::from_ids(payload.player_id, payload.team_id)?;
    if !participant.fits(tournament.format) {
        let expected = match tournament.format {
            TournamentFormat::Solo => "player",
            TournamentFormat::Team => "team",
        };
        return Err(AppError::ParticipantMismatch(tournament.format, expected));
    }

    match participant {
        Participant::Player(id) => {
            if auth_repo::get_user(&mut *tx, id).await?.is_none() {
                return Err(AppError::UserNotFound(id));
            }
        }
        Participant::Team(id) => {
            if team_repo::get_team(&mut *tx, id).await?.is_none() {
                return Err(AppError::TeamNotFound(id));
            }
        }
    }

    if registration_repo::find_participant_registration(&mut *tx, tournament_id, participant)
        .await?
        .is_some()
    {
        return Err(AppError::AlreadyRegistered(tournament_id));
    }

    let holding = registration_repo::count_registrations(&mut *tx, tournament_id, &HOLDING_SEAT)
        .await?;
    if holding >= tournament.max_participants {
        tracing::debug!(
            "tournament {} is full ({}/{})",
            tournament_id,
            holding,
            tournament.max_participants
        );
        return Err(AppError::TournamentFull(tournament_id));
    }

    let registration = registration_repo::create_registration(
        &mut *tx,
        tournament_id,
        participant,
        clock.timestamp(),
    )
    .await
    .map_err(|e| {
        if errors::is_unique_violation(&e) {
            AppError::AlreadyRegistered(tournament_id)
        } else {
            AppError::Database(e)
        }
    })?;
    tx.commit().await?;

    tracing::info!(
        "{} registered to tournament {} as registration {}",
        participant,
        tournament_id,
        registration.id
    );
    Ok(registration)
}

impl From<DbRegistration> for RegistrationDetails {
    fn from(value: DbRegistration) -> Self {
        let participant = match value.team_id {
            Some(id) => ParticipantDetails::Team {
                id,
                name: value.team_name.unwrap_or_default(),
                tag: value.team_tag.unwrap_or_default(),
            },
            None => ParticipantDetails::Player {
                id: value.player_id.unwrap_or_default(),
                username: value.player_username.unwrap_or_default(),
            },
        };
        Self {
            registration: Registration {
                id: value.id,
                tournament_id: value.tournament_id,
                player_id: value.player_id,
                team_id: value.team_id,
                status: value.status,
                registered_at: value.registered_at,
                confirmed_at: value.confirmed_at,
            },
            participant,
        }
    }
}

pub async fn list_for_tournament(
    pool: &SqlitePool,
    tournament_id: i64,
) -> Result<Vec<RegistrationDetails>, AppError> {
    if tournament_repo::get_tournament(pool, tournament_id)
        .await?
        .is_none()
    {
        return Err(AppError::TournamentNotFound(tournament_id));
    }
    let rows = registration_repo::select_registrations(pool, tournament_id).await?;
    Ok(rows.into_iter().map(RegistrationDetails::from).collect())
}

/// Persists any status; transitions are not policed here.
pub async fn update_registration_status(
    pool: &SqlitePool,
    clock: &dyn Clock,
    id: i64,
    status: RegistrationStatus,
) -> Result<Registration, AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    let current = registration_repo::get_registration(&mut *tx, id)
        .await?
        .ok_or(AppError::RegistrationNotFound(id))?;
    let confirmed_at = (status == RegistrationStatus::Confirmed).then(|| clock.timestamp());
    let registration =
        registration_repo::update_registration_status(&mut *tx, id, status, confirmed_at).await?;
    tx.commit().await?;
    tracing::info!(
        "registration {} moved from {} to {}",
        id,
        current.status,
        registration.status
    );
    Ok(registration)
}

pub async fn cancel_registration(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    let current = registration_repo::get_registration(&mut *tx, id)
        .await?
        .ok_or(AppError::RegistrationNotFound(id))?;
    if current.status != RegistrationStatus::Pending {
        return Err(AppError::RegistrationNotPending(id, current.status));
    }
    registration_repo::delete_registration(&mut *tx, id).await?;
    tx.commit().await?;
    tracing::info!("registration {} cancelled", id);
    Ok(())
}
