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
    payloads::{GameFilter, NewGame},
    responses::{AppResponse, Json, Query, SuccessResponse},
    services::game_service,
};

async fn list_games(
    State(pool): State<SqlitePool>,
    Query(filter): Query<GameFilter>,
) -> impl IntoResponse {
    match game_service::list_games(&pool, filter).await {
        Ok(page) => AppResponse::from(page).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_game(Path(id): Path<i64>, State(pool): State<SqlitePool>) -> impl IntoResponse {
    match game_service::get_game(&pool, id).await {
        Ok(game) => AppResponse::from(game).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn create_game(
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    CurrentUser(_claims): CurrentUser,
    Json(payload): Json<NewGame>,
) -> impl IntoResponse {
    match game_service::create_game(&pool, clock.as_ref(), payload).await {
        Ok(game) => AppResponse::from(game).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn replace_game(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    CurrentUser(_claims): CurrentUser,
    Json(payload): Json<NewGame>,
) -> impl IntoResponse {
    match game_service::replace_game(&pool, clock.as_ref(), id, payload).await {
        Ok(game) => AppResponse::from(game).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_game(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(_claims): CurrentUser,
) -> impl IntoResponse {
    match game_service::remove_game(&pool, id).await {
        Ok(()) => AppResponse::from(SuccessResponse::Deleted { id }).into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_games))
        .route("/", post(create_game))
        .route("/{id}", get(get_game))
        .route("/{id}", put(replace_game))
        .route("/{id}", delete(delete_game))
        .with_state(state)
}
