use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, patch},
};
use sqlx::SqlitePool;

use crate::{
    AppState,
    auth::extractor::{CurrentUser, Organizer},
    clock::Clock,
    payloads::RegistrationStatusPayload,
    responses::{AppResponse, Json, SuccessResponse},
    services::registration_service,
};

async fn update_registration_status(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    Organizer(_claims): Organizer,
    Json(payload): Json<RegistrationStatusPayload>,
) -> impl IntoResponse {
    match registration_service::update_registration_status(
        &pool,
        clock.as_ref(),
        id,
        payload.status,
    )
    .await
    {
        Ok(registration) => AppResponse::from(registration).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn cancel_registration(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(_claims): CurrentUser,
) -> impl IntoResponse {
    match registration_service::cancel_registration(&pool, id).await {
        Ok(()) => AppResponse::from(SuccessResponse::Deleted { id }).into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/{id}", patch(update_registration_status))
        .route("/{id}", delete(cancel_registration))
        .with_state(state)
}
