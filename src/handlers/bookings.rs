use std::sync::Arc;

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
    clock::Clock,
    payloads::{BookingChanges, BookingFilter, NewBooking},
    responses::{AppResponse, Json, Query, SuccessResponse},
    services::booking_service,
};

async fn list_bookings(
    State(pool): State<SqlitePool>,
    Query(filter): Query<BookingFilter>,
) -> impl IntoResponse {
    match booking_service::list_bookings(&pool, filter).await {
        Ok(page) => AppResponse::from(page).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_booking(Path(id): Path<i64>, State(pool): State<SqlitePool>) -> impl IntoResponse {
    match booking_service::get_booking(&pool, id).await {
        Ok(booking) => AppResponse::from(booking).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Books for the caller unless the payload names another user.
async fn create_booking(
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<NewBooking>,
) -> impl IntoResponse {
    match booking_service::create_booking(&pool, clock.as_ref(), claims.sub, payload).await {
        Ok(booking) => AppResponse::from(booking).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn update_booking(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(_claims): CurrentUser,
    Json(payload): Json<BookingChanges>,
) -> impl IntoResponse {
    match booking_service::update_booking(&pool, id, payload).await {
        Ok(booking) => AppResponse::from(booking).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_booking(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(_claims): CurrentUser,
) -> impl IntoResponse {
    match booking_service::remove_booking(&pool, id).await {
        Ok(()) => AppResponse::from(SuccessResponse::Deleted { id }).into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_bookings))
        .route("/", post(create_booking))
        .route("/{id}", get(get_booking))
        .route("/{id}", put(update_booking))
        .route("/{id}", delete(delete_booking))
        .with_state(state)
}
