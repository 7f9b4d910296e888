use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Router, extract::FromRef};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    auth::{admin::create_administrator, jwt::JwtKeys},
    clock::{Clock, SystemClock},
    config::Config,
    handlers::{bookings, games, registrations, stations, teams, tournaments, users},
};

mod auth;
mod clock;
mod config;
mod errors;
mod handlers;
mod models;
mod pagination;
mod payloads;
mod repositories;
mod responses;
mod services;

#[derive(Clone)]
struct AppState {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    keys: Arc<JwtKeys>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(input: &AppState) -> Self {
        input.pool.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Clock> {
    fn from_ref(input: &AppState) -> Self {
        input.clock.clone()
    }
}

impl FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(input: &AppState) -> Self {
        input.keys.clone()
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .nest("/stations", stations::routes(state.clone()))
        .nest("/bookings", bookings::routes(state.clone()))
        .nest("/tournaments", tournaments::routes(state.clone()))
        .nest("/registrations", registrations::routes(state.clone()))
        .nest("/teams", teams::routes(state.clone()))
        .nest("/games", games::routes(state.clone()))
        .nest("/users", users::routes(state.clone()))
        .nest("/auth", handlers::auth::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lanparty=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    if let Some(seed) = &config.admin {
        create_administrator(&pool, seed).await?;
    }

    let state = AppState {
        pool,
        clock: Arc::new(SystemClock),
        keys: Arc::new(JwtKeys::new(
            &config.jwt_secret,
            config.jwt_expires_in_hours,
        )),
    };
    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
