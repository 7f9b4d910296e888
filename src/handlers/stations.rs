use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use sqlx::SqlitePool;

use crate::{
    AppState,
    auth::extractor::CurrentUser,
    payloads::{AvailabilityQuery, NewStation, StationChanges, StationFilter},
    responses::{AppResponse, Json, Query, SuccessResponse},
    services::{booking_service, station_service},
};

async fn list_stations(
    State(pool): State<SqlitePool>,
    Query(filter): Query<StationFilter>,
) -> impl IntoResponse {
    match station_service::list_stations(&pool, filter).await {
        Ok(page) => AppResponse::from(page).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_station(Path(id): Path<i64>, State(pool): State<SqlitePool>) -> impl IntoResponse {
    match station_service::get_station(&pool, id).await {
        Ok(station) => AppResponse::from(station).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn create_station(
    State(pool): State<SqlitePool>,
    CurrentUser(_claims): CurrentUser,
    Json(payload): Json<NewStation>,
) -> impl IntoResponse {
    match station_service::create_station(&pool, payload).await {
        Ok(station) => AppResponse::from(station).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn update_station(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(_claims): CurrentUser,
    Json(payload): Json<StationChanges>,
) -> impl IntoResponse {
    match station_service::update_station(&pool, id, payload).await {
        Ok(station) => AppResponse::from(station).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_station(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(_claims): CurrentUser,
) -> impl IntoResponse {
    match station_service::remove_station(&pool, id).await {
        Ok(()) => AppResponse::from(SuccessResponse::Deleted { id }).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn check_availability(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    Query(query): Query<AvailabilityQuery>,
) -> impl IntoResponse {
    match booking_service::check_available(&pool, id, query.start, query.end, query.exclude).await
    {
        Ok(available) => AppResponse::Success {
            payload: SuccessResponse::StationAvailability {
                station_id: id,
                start: query.start,
                end: query.end,
                available,
            },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_stations))
        .route("/", post(create_station))
        .route("/{id}", get(get_station))
        .route("/{id}", put(update_station))
        .route("/{id}", delete(delete_station))
        .route("/{id}/availability", get(check_availability))
        .with_state(state)
}
