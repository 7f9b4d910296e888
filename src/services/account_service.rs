use sqlx::SqlitePool;

use crate::{
    auth::{
        hasher::{hash_password, verify_password},
        jwt::JwtKeys,
    },
    clock::Clock,
    errors::{self, AppError},
    models::user::{Role, User, validate_email, validate_password, validate_username},
    payloads::{LoginPayload, NewUser},
    repositories::{self, auth_repo},
};

pub async fn register_user(
    pool: &SqlitePool,
    clock: &dyn Clock,
    payload: NewUser,
) -> Result<User, AppError> {
    let username = payload.username.trim();
    let email = payload.email.trim().to_lowercase();
    validate_username(username)?;
    validate_email(&email)?;
    validate_password(&payload.password)?;

    if let Some(existing) =
        auth_repo::find_user_by_username_or_email(pool, username, &email).await?
    {
        return Err(if existing.email == email {
            AppError::EmailTaken(email)
        } else {
            AppError::UsernameTaken(username.to_string())
        });
    }

    let password_hash = hash_password(&payload.password)?;
    let user = auth_repo::create_user(
        pool,
        username,
        &email,
        &password_hash,
        Role::Player,
        clock.timestamp(),
    )
    .await
    .map_err(|e| {
        if errors::is_unique_violation(&e) {
            AppError::UsernameTaken(username.to_string())
        } else {
            AppError::Database(e)
        }
    })?;
    tracing::info!("user {} registered as {}", user.id, user.username);
    Ok(user)
}

/// Returns a signed token together with the authenticated user.
pub async fn login(
    pool: &SqlitePool,
    keys: &JwtKeys,
    clock: &dyn Clock,
    payload: LoginPayload,
) -> Result<(String, User), AppError> {
    let email = payload.email.trim().to_lowercase();
    let db_user = auth_repo::get_user_by_email(pool, &email).await?;
    if !verify_password(&payload.password, &db_user.password_hash) {
        tracing::debug!("failed login for {}", email);
        return Err(AppError::LoginFailed("Invalid credentials".to_string()));
    }
    let user = User::from(db_user);
    let token = keys.create_token(&user, clock.now()).map_err(|e| {
        tracing::error!("create_token: {:?}", e);
        AppError::Unknown
    })?;
    Ok((token, user))
}

pub async fn profile(pool: &SqlitePool, user_id: i64) -> Result<User, AppError> {
    auth_repo::get_user(pool, user_id)
        .await?
        .ok_or(AppError::UserNotFound(user_id))
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
    Ok(auth_repo::list_users(pool).await?)
}

pub async fn change_user_role(
    pool: &SqlitePool,
    requester_id: i64,
    id: i64,
    role: Role,
) -> Result<User, AppError> {
    if id == requester_id {
        return Err(AppError::CannotChangeOwnRole);
    }
    let user = auth_repo::update_user_role(pool, id, role)
        .await?
        .ok_or(AppError::UserNotFound(id))?;
    tracing::info!("user {} is now {} (set by {})", id, role, requester_id);
    Ok(user)
}

/// Bookings, memberships and registrations of the user go with it.
pub async fn remove_user(pool: &SqlitePool, requester_id: i64, id: i64) -> Result<(), AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    if auth_repo::get_user(&mut *tx, id).await?.is_none() {
        return Err(AppError::UserNotFound(id));
    }
    if id == requester_id {
        return Err(AppError::CannotDeleteSelf);
    }
    auth_repo::delete_user(&mut *tx, id).await.map_err(|e| {
        if errors::is_foreign_key_violation(&e) {
            AppError::UserHasDependents(id)
        } else {
            AppError::Database(e)
        }
    })?;
    tx.commit().await?;
    tracing::info!("user {} deleted by {}", id, requester_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::clock::FixedClock;

    use super::*;

    const NOW: i64 = 1_800_000_000;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "Fr4gN1ght".to_string(),
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_register_then_login(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        let user = register_user(&pool, &clock, new_user("rocket_jumper", "RJ@lan.party"))
            .await
            .expect("failed to register user");
        assert_eq!(user.role, Role::Player);
        assert_eq!(user.email, "rj@lan.party");
        assert_eq!(user.created_at, NOW);

        let keys = JwtKeys::new("an-hs256-secret-of-at-least-32-chars", 24);
        let (token, logged_in) = login(
            &pool,
            &keys,
            &clock,
            LoginPayload {
                email: "rj@lan.party".to_string(),
                password: "Fr4gN1ght".to_string(),
            },
        )
        .await
        .expect("failed to log in");
        assert_eq!(logged_in.id, user.id);
        let claims = keys.validate_token(&token).expect("token rejected");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Player);

        let wrong = login(
            &pool,
            &keys,
            &clock,
            LoginPayload {
                email: "rj@lan.party".to_string(),
                password: "wrong-password".to_string(),
            },
        )
        .await;
        assert!(matches!(wrong, Err(AppError::LoginFailed(_))));
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_register_rejects_taken_identity(pool: SqlitePool) {
        let clock = FixedClock::at(NOW);
        assert!(matches!(
            register_user(&pool, &clock, new_user("player1", "fresh@lan.party")).await,
            Err(AppError::UsernameTaken(_))
        ));
        assert!(matches!(
            register_user(&pool, &clock, new_user("fresh_face", "player1@lan.party")).await,
            Err(AppError::EmailTaken(_))
        ));
        assert!(matches!(
            register_user(&pool, &clock, new_user("no spaces", "fresh@lan.party")).await,
            Err(AppError::InvalidField {
                field: "username",
                ..
            })
        ));
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_list_users_hides_credentials(pool: SqlitePool) {
        let users = list_users(&pool).await.expect("failed to list users");
        assert_eq!(users.len(), 8);
        assert_eq!(users[0].username, "admin");
        let body = serde_json::to_value(&users[0]).expect("failed to serialize user");
        assert!(body.get("passwordHash").is_none());
    }

    #[sqlx::test(fixtures(
        path = "../../fixtures",
        scripts("users", "stations", "tournaments", "teams", "registrations")
    ))]
    async fn test_remove_user_guards(pool: SqlitePool) {
        assert!(matches!(
            remove_user(&pool, 1, 1).await,
            Err(AppError::CannotDeleteSelf)
        ));
        assert!(matches!(
            remove_user(&pool, 1, 404).await,
            Err(AppError::UserNotFound(404))
        ));
        assert!(matches!(
            remove_user(&pool, 1, 2).await,
            Err(AppError::UserHasDependents(2))
        ));
        assert!(matches!(
            remove_user(&pool, 1, 7).await,
            Err(AppError::UserHasDependents(7))
        ));

        remove_user(&pool, 1, 6)
            .await
            .expect("member of a team can be deleted");
        assert!(matches!(
            profile(&pool, 6).await,
            Err(AppError::UserNotFound(6))
        ));
        assert_eq!(list_users(&pool).await.expect("failed to list").len(), 7);
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_change_user_role(pool: SqlitePool) {
        let promoted = change_user_role(&pool, 1, 3, Role::Organizer)
            .await
            .expect("failed to promote user");
        assert_eq!(promoted.role, Role::Organizer);
        assert!(promoted.role.can_manage_tournaments());
        assert!(matches!(
            change_user_role(&pool, 1, 1, Role::Player).await,
            Err(AppError::CannotChangeOwnRole)
        ));
        assert!(matches!(
            change_user_role(&pool, 1, 404, Role::Organizer).await,
            Err(AppError::UserNotFound(404))
        ));
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_profile(pool: SqlitePool) {
        let organizer = profile(&pool, 2).await.expect("user exists");
        assert_eq!(organizer.role, Role::Organizer);
        assert!(matches!(
            profile(&pool, 404).await,
            Err(AppError::UserNotFound(404))
        ));
    }
}
