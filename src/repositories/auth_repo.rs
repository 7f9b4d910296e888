use sqlx::{SqliteExecutor, prelude::FromRow};

use crate::{
    errors::AppError,
    models::user::{Role, User},
};

#[derive(FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: i64,
}

impl From<DbUser> for User {
    fn from(value: DbUser) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
            role: value.role,
            created_at: value.created_at,
        }
    }
}

pub async fn get_user_by_email<'e>(
    executor: impl SqliteExecutor<'e>,
    email: &str,
) -> Result<DbUser, AppError> {
    let maybe_user: Option<DbUser> = sqlx::query_as("select * from users where email = ?1")
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            tracing::error!("get_user_by_email: {:?}", e);
            AppError::Unknown
        })?;
    maybe_user.ok_or_else(|| AppError::LoginFailed("Invalid credentials".to_string()))
}

pub async fn get_user<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as("select id, username, email, role, created_at from users where id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_user_by_username_or_email<'e>(
    executor: impl SqliteExecutor<'e>,
    username: &str,
    email: &str,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as(
        "select id, username, email, role, created_at from users
            where username = ?1 or email = ?2
            limit 1",
    )
    .bind(username)
    .bind(email)
    .fetch_optional(executor)
    .await
}

pub async fn create_user<'e>(
    executor: impl SqliteExecutor<'e>,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    now: i64,
) -> sqlx::Result<User> {
    sqlx::query_as(
        "insert into users (username, email, password_hash, role, created_at)
            values (?1, ?2, ?3, ?4, ?5)
            returning id, username, email, role, created_at",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn create_admin<'e>(
    executor: impl SqliteExecutor<'e>,
    username: &str,
    email: &str,
    password_hash: &str,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        "insert or ignore into users (username, email, password_hash, role)
            values (?1, ?2, ?3, ?4)",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(Role::Admin)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list_users<'e>(executor: impl SqliteExecutor<'e>) -> sqlx::Result<Vec<User>> {
    sqlx::query_as("select id, username, email, role, created_at from users order by id asc")
        .fetch_all(executor)
        .await
}

pub async fn update_user_role<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    role: Role,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as(
        "update users set role = ?1 where id = ?2
            returning id, username, email, role, created_at",
    )
    .bind(role)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn delete_user<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("delete from users where id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn test_create_user(pool: sqlx::SqlitePool) {
        let user = create_user(&pool, "player1", "player1@lan.party", "hash", Role::Player, 42)
            .await
            .expect("failed to create user");
        assert_eq!(user.role, Role::Player);
        assert_eq!(user.created_at, 42);
        let found = get_user_by_email(&pool, "player1@lan.party")
            .await
            .expect("user not found");
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, "hash");
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_admin_seed_is_idempotent(pool: sqlx::SqlitePool) {
        let inserted = create_admin(&pool, "admin", "admin@lan.party", "hash")
            .await
            .expect("failed to seed admin");
        assert_eq!(inserted, 0);
        let taken = find_user_by_username_or_email(&pool, "someone", "organizer@lan.party")
            .await
            .expect("failed to query users");
        assert_eq!(taken.map(|u| u.id), Some(2));
    }
}
