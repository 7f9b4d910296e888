use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use sqlx::SqlitePool;

use crate::{
    AppState,
    auth::{extractor::CurrentUser, jwt::JwtKeys},
    clock::Clock,
    payloads::{LoginPayload, NewUser},
    responses::{AppResponse, Json, SuccessResponse},
    services::account_service,
};

async fn login(
    State(pool): State<SqlitePool>,
    State(keys): State<Arc<JwtKeys>>,
    State(clock): State<Arc<dyn Clock>>,
    Json(payload): Json<LoginPayload>,
) -> impl IntoResponse {
    match account_service::login(&pool, &keys, clock.as_ref(), payload).await {
        Ok((token, user)) => AppResponse::Success {
            payload: SuccessResponse::LoginSuccess { token, user },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn create_user(
    State(pool): State<SqlitePool>,
    State(clock): State<Arc<dyn Clock>>,
    Json(payload): Json<NewUser>,
) -> impl IntoResponse {
    match account_service::register_user(&pool, clock.as_ref(), payload).await {
        Ok(user) => AppResponse::Success {
            payload: SuccessResponse::UserCreated { user },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn profile(
    State(pool): State<SqlitePool>,
    CurrentUser(claims): CurrentUser,
) -> impl IntoResponse {
    match account_service::profile(&pool, claims.sub).await {
        Ok(user) => AppResponse::Success {
            payload: SuccessResponse::Profile { user },
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(create_user))
        .route("/profile", get(profile))
        .with_state(state)
}
