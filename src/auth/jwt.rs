use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error as JwtError,
};
use serde::{Deserialize, Serialize};

use crate::models::user::{Role, User};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: Role,
    pub exp: i64,
}

/// HS256 signing material and token lifetime, built once from the config.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, lifetime_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    pub fn create_token(&self, user: &User, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            exp: (now + self.lifetime).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &Validation::default()).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "an-hs256-secret-of-at-least-32-chars";

    fn user(role: Role) -> User {
        User {
            id: 2,
            username: "organizer1".to_string(),
            email: "organizer@lan.party".to_string(),
            role,
            created_at: 0,
        }
    }

    #[test]
    fn test_token_carries_identity() {
        let keys = JwtKeys::new(SECRET, 24);
        let now = Utc::now();
        let token = keys
            .create_token(&user(Role::Organizer), now)
            .expect("failed to sign token");
        let claims = keys.validate_token(&token).expect("token rejected");
        assert_eq!(claims.sub, 2);
        assert_eq!(claims.username, "organizer1");
        assert_eq!(claims.role, Role::Organizer);
        assert_eq!(claims.exp, (now + Duration::hours(24)).timestamp());
    }

    #[test]
    fn test_rejects_foreign_and_expired_tokens() {
        let keys = JwtKeys::new(SECRET, 24);
        let other = JwtKeys::new("another-secret-that-is-long-enough!!", 24);
        let token = other
            .create_token(&user(Role::Player), Utc::now())
            .expect("failed to sign token");
        assert!(keys.validate_token(&token).is_err());

        let stale = keys
            .create_token(&user(Role::Player), Utc::now() - Duration::hours(48))
            .expect("failed to sign token");
        assert!(keys.validate_token(&stale).is_err());
    }
}
