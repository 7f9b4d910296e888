use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::{errors::AppError, models::user::Role};

use super::jwt::{Claims, JwtKeys};

#[derive(Clone)]
pub struct CurrentUser(pub Claims);

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<JwtKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::InvalidAuthHeader)?;

        let keys = Arc::<JwtKeys>::from_ref(state);
        let claims = keys
            .validate_token(token)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(CurrentUser(claims))
    }
}

/// A bearer whose role may manage tournaments and registrations.
#[derive(Clone)]
pub struct Organizer(pub Claims);

impl<S> FromRequestParts<S> for Organizer
where
    Arc<JwtKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(claims) = CurrentUser::from_request_parts(parts, state).await?;
        if !claims.role.can_manage_tournaments() {
            tracing::warn!(
                "user {} with role {:?} denied organizer access",
                claims.sub,
                claims.role
            );
            return Err(AppError::InsufficientPermissions);
        }
        Ok(Organizer(claims))
    }
}

/// A bearer holding the ADMIN role.
#[derive(Clone)]
pub struct Admin(pub Claims);

impl<S> FromRequestParts<S> for Admin
where
    Arc<JwtKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(claims) = CurrentUser::from_request_parts(parts, state).await?;
        if claims.role != Role::Admin {
            tracing::warn!("user {} denied admin access", claims.sub);
            return Err(AppError::InsufficientPermissions);
        }
        Ok(Admin(claims))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use chrono::Utc;

    use crate::models::user::User;

    use super::*;

    fn bearer_parts(keys: &JwtKeys, role: Role) -> Parts {
        let user = User {
            id: 1,
            username: "someone".to_string(),
            email: "someone@lan.party".to_string(),
            role,
            created_at: 0,
        };
        let token = keys
            .create_token(&user, Utc::now())
            .expect("failed to sign token");
        let (parts, _) = Request::builder()
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(())
            .expect("failed to build request")
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn test_admin_requires_admin_role() {
        let keys = Arc::new(JwtKeys::new("an-hs256-secret-of-at-least-32-chars", 24));
        let mut admin = bearer_parts(&keys, Role::Admin);
        assert!(Admin::from_request_parts(&mut admin, &keys).await.is_ok());

        let mut organizer = bearer_parts(&keys, Role::Organizer);
        assert!(matches!(
            Admin::from_request_parts(&mut organizer, &keys).await,
            Err(AppError::InsufficientPermissions)
        ));
        assert!(
            Organizer::from_request_parts(&mut organizer, &keys)
                .await
                .is_ok()
        );

        let (mut anonymous, _) = Request::builder()
            .body(())
            .expect("failed to build request")
            .into_parts();
        assert!(matches!(
            Admin::from_request_parts(&mut anonymous, &keys).await,
            Err(AppError::InvalidAuthHeader)
        ));
    }
}
