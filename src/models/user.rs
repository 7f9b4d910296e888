use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::errors::AppError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Player,
    Organizer,
    Admin,
}

impl Role {
    pub fn can_manage_tournaments(&self) -> bool {
        matches!(self, Role::Organizer | Role::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Player => write!(f, "PLAYER"),
            Role::Organizer => write!(f, "ORGANIZER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// A user as exposed outside the auth layer, without credentials.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: i64,
}

pub fn validate_username(username: &str) -> Result<(), AppError> {
    if !(3..=20).contains(&username.len()) {
        return Err(AppError::InvalidField {
            field: "username",
            reason: "must contain between 3 and 20 characters",
        });
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::InvalidField {
            field: "username",
            reason: "allowed characters are letters, digits and underscore",
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::InvalidField {
            field: "email",
            reason: "invalid email format",
        });
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < 8 {
        return Err(AppError::InvalidField {
            field: "password",
            reason: "must contain at least 8 characters",
        });
    }
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    if !(upper && lower && digit) {
        return Err(AppError::InvalidField {
            field: "password",
            reason: "must contain an uppercase letter, a lowercase letter and a digit",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert!(Role::Organizer.can_manage_tournaments());
        assert!(Role::Admin.can_manage_tournaments());
        assert!(!Role::Player.can_manage_tournaments());
    }

    #[test]
    fn test_credentials_validation() {
        assert!(validate_username("fragmaster_99").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("no spaces").is_err());
        assert!(validate_email("player1@lan.party").is_ok());
        assert!(validate_email("player1.lan.party").is_err());
        assert!(validate_email("player1@party").is_err());
        assert!(validate_password("P@ssw0rd").is_ok());
        assert!(validate_password("password").is_err());
        assert!(validate_password("Sh0rt").is_err());
    }
}
