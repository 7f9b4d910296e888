use sqlx::SqlitePool;

use crate::{
    auth::hasher::hash_password, config::AdminSeed, errors::AppError,
    repositories::auth_repo::create_admin,
};

/// Inserts the configured administrator unless the username or email is taken.
pub async fn create_administrator(pool: &SqlitePool, seed: &AdminSeed) -> Result<(), AppError> {
    let password_hash = hash_password(&seed.password)?;
    if create_admin(pool, &seed.username, &seed.email, &password_hash).await? > 0 {
        tracing::info!("Created admin user: {}", seed.username);
    } else {
        tracing::debug!("admin user {} already present", seed.username);
    }
    Ok(())
}
