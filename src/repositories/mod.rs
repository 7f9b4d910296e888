use sqlx::{Sqlite, SqlitePool, Transaction};

pub mod auth_repo;
pub mod booking_repo;
pub mod game_repo;
pub mod registration_repo;
pub mod station_repo;
pub mod team_repo;
pub mod tournament_repo;

/// Starts a transaction that takes the database write lock up front, so
/// concurrent check-then-write sequences queue on the busy timeout instead of
/// failing to upgrade a shared lock.
pub async fn begin_write(pool: &SqlitePool) -> sqlx::Result<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE").await
}
