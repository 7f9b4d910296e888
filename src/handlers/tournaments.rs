use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use sqlx::SqlitePool;

use crate::{
    AppState,
    auth::extractor::{CurrentUser, Organizer},
    clock::Clock,
    payloads::{
        NewRegistration, NewTournament, TournamentChanges, TournamentFilter,
        TournamentStatusPayload,
    },
    responses::{AppResponse, Json, Query, SuccessResponse},
    services::{registration_service, tournament_service},
};

async fn list_tournaments(
    State(pool): State<SqlitePool>,
    Query(filter): Query<TournamentFilter>,
) -> impl IntoResponse {
    match tournament_service::list_tournaments(&pool, filter).await {
        Ok(page) => AppResponse::from(page).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_tournament(Path(id): Path<i64>, State(pool): State<SqlitePool>) -> impl IntoResponse {
    match tournament_service::get_tournament(&pool, id).await {
        Ok(tournament) => AppResponse::from(tournament).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn create_tournament(
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    Organizer(claims): Organizer,
    Json(payload): Json<NewTournament>,
) -> impl IntoResponse {
    match tournament_service::create_tournament(&pool, clock.as_ref(), claims.sub, payload).await {
        Ok(tournament) => AppResponse::from(tournament).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn update_tournament(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    Organizer(_claims): Organizer,
    Json(payload): Json<TournamentChanges>,
) -> impl IntoResponse {
    match tournament_service::update_tournament(&pool, clock.as_ref(), id, payload).await {
        Ok(tournament) => AppResponse::from(tournament).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_tournament(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    Organizer(_claims): Organizer,
) -> impl IntoResponse {
    match tournament_service::remove_tournament(&pool, id).await {
        Ok(()) => AppResponse::from(SuccessResponse::Deleted { id }).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn update_tournament_status(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    Organizer(_claims): Organizer,
    Json(payload): Json<TournamentStatusPayload>,
) -> impl IntoResponse {
    match tournament_service::update_tournament_status(&pool, clock.as_ref(), id, payload.status)
        .await
    {
        Ok(tournament) => AppResponse::from(tournament).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn register_participant(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    CurrentUser(_claims): CurrentUser,
    Json(payload): Json<NewRegistration>,
) -> impl IntoResponse {
    match registration_service::register(&pool, clock.as_ref(), id, payload).await {
        Ok(registration) => AppResponse::from(registration).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn list_registrations(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(_claims): CurrentUser,
) -> impl IntoResponse {
    match registration_service::list_for_tournament(&pool, id).await {
        Ok(registrations) => AppResponse::Success {
            payload: SuccessResponse::RegistrationList {
                tournament_id: id,
                registrations,
            },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_tournaments))
        .route("/", post(create_tournament))
        .route("/{id}", get(get_tournament))
        .route("/{id}", put(update_tournament))
        .route("/{id}", delete(delete_tournament))
        .route("/{id}/status", patch(update_tournament_status))
        .route("/{id}/registrations", post(register_participant))
        .route("/{id}/registrations", get(list_registrations))
        .with_state(state)
}
