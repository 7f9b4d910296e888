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
    payloads::{NewTeam, NewTeamMember, TeamChanges},
    responses::{AppResponse, Json, SuccessResponse},
    services::team_service,
};

async fn list_teams(State(pool): State<SqlitePool>) -> impl IntoResponse {
    match team_service::list_teams(&pool).await {
        Ok(teams) => AppResponse::from(teams).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_team(Path(id): Path<i64>, State(pool): State<SqlitePool>) -> impl IntoResponse {
    match team_service::get_team(&pool, id).await {
        Ok(team) => AppResponse::from(team).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn create_team(
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<NewTeam>,
) -> impl IntoResponse {
    match team_service::create_team(&pool, clock.as_ref(), claims.sub, payload).await {
        Ok(team) => AppResponse::from(team).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn update_team(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<TeamChanges>,
) -> impl IntoResponse {
    match team_service::update_team(&pool, id, claims.sub, payload).await {
        Ok(team) => AppResponse::from(team).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_team(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    CurrentUser(claims): CurrentUser,
) -> impl IntoResponse {
    match team_service::remove_team(&pool, id, claims.sub).await {
        Ok(()) => AppResponse::from(SuccessResponse::Deleted { id }).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn add_member(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    CurrentUser(claims): CurrentUser,
    Json(payload): Json<NewTeamMember>,
) -> impl IntoResponse {
    match team_service::add_member(&pool, clock.as_ref(), id, claims.sub, payload.user_id).await {
        Ok(team) => AppResponse::from(team).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn remove_member(
    Path((id, user_id)): Path<(i64, i64)>,
    State(pool): State<SqlitePool>,
    CurrentUser(claims): CurrentUser,
) -> impl IntoResponse {
    match team_service::remove_member(&pool, id, claims.sub, user_id).await {
        Ok(team) => AppResponse::from(team).into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_teams))
        .route("/", post(create_team))
        .route("/{id}", get(get_team))
        .route("/{id}", put(update_team))
        .route("/{id}", delete(delete_team))
        .route("/{id}/members", post(add_member))
        .route("/{id}/members/{user_id}", delete(remove_member))
        .with_state(state)
}
