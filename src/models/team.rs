use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::errors::AppError;

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub tag: String,
    pub captain_id: i64,
    pub created_at: i64,
}

impl Team {
    pub fn is_captain(&self, user_id: i64) -> bool {
        self.captain_id == user_id
    }

    /// Only the captain may change or delete a team.
    pub fn ensure_captain(&self, user_id: i64) -> Result<(), AppError> {
        if !self.is_captain(user_id) {
            tracing::warn!(
                "user {} attempted to modify team {} owned by {}",
                user_id,
                self.id,
                self.captain_id
            );
            return Err(AppError::NotTeamCaptain);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: i64,
    pub username: String,
    pub is_captain: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetails {
    #[serde(flatten)]
    pub team: Team,
    pub members: Vec<TeamMember>,
}

pub fn validate_team_name(name: &str) -> Result<(), AppError> {
    let len = name.trim().chars().count();
    if !(3..=50).contains(&len) {
        return Err(AppError::InvalidField {
            field: "name",
            reason: "must contain between 3 and 50 characters",
        });
    }
    Ok(())
}

/// Tags are 3 to 5 uppercase letters or digits.
pub fn validate_team_tag(tag: &str) -> Result<(), AppError> {
    if !(3..=5).contains(&tag.len()) {
        return Err(AppError::InvalidField {
            field: "tag",
            reason: "must contain between 3 and 5 characters",
        });
    }
    if !tag
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(AppError::InvalidField {
            field: "tag",
            reason: "must contain only uppercase letters and digits",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_tags() {
        assert!(validate_team_tag("ALPHA").is_ok());
        assert!(validate_team_tag("T42").is_ok());
        assert!(validate_team_tag("AB").is_err());
        assert!(validate_team_tag("TOOLONG").is_err());
        assert!(validate_team_tag("alpha").is_err());
        assert!(validate_team_tag("AL-P").is_err());
        assert!(validate_team_tag("ÉTÉS").is_err());
    }

    #[test]
    fn test_team_names() {
        assert!(validate_team_name("Team Alpha").is_ok());
        assert!(validate_team_name("  ab ").is_err());
        assert!(validate_team_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_only_captain_passes_guard() {
        let team = Team {
            id: 1,
            name: "Team Alpha".to_string(),
            tag: "ALPHA".to_string(),
            captain_id: 7,
            created_at: 0,
        };
        assert!(team.ensure_captain(7).is_ok());
        assert!(matches!(
            team.ensure_captain(8),
            Err(AppError::NotTeamCaptain)
        ));
    }
}
