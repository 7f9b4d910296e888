use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, patch},
};
use sqlx::SqlitePool;

use crate::{
    AppState,
    auth::extractor::Admin,
    payloads::UserRolePayload,
    responses::{AppResponse, Json, SuccessResponse},
    services::account_service,
};

async fn list_users(State(pool): State<SqlitePool>, Admin(_claims): Admin) -> impl IntoResponse {
    match account_service::list_users(&pool).await {
        Ok(users) => AppResponse::from(users).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn change_user_role(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    Admin(claims): Admin,
    Json(payload): Json<UserRolePayload>,
) -> impl IntoResponse {
    match account_service::change_user_role(&pool, claims.sub, id, payload.role).await {
        Ok(user) => AppResponse::from(SuccessResponse::Profile { user }).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_user(
    Path(id): Path<i64>,
    State(pool): State<SqlitePool>,
    Admin(claims): Admin,
) -> impl IntoResponse {
    match account_service::remove_user(&pool, claims.sub, id).await {
        Ok(()) => AppResponse::from(SuccessResponse::Deleted { id }).into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", delete(delete_user))
        .route("/{id}/role", patch(change_user_role))
        .with_state(state)
}
