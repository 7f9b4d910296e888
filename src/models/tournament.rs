use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::errors::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum TournamentFormat {
    Solo,
    Team,
}

impl Display for TournamentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentFormat::Solo => write!(f, "SOLO"),
            TournamentFormat::Team => write!(f, "TEAM"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum TournamentStatus {
    #[default]
    Draft,
    Open,
    Ongoing,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    /// Completed and cancelled tournaments can no longer be edited.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TournamentStatus::Completed | TournamentStatus::Cancelled)
    }

    /// Tournaments whose participants are locked in.
    pub const ACTIVE: [TournamentStatus; 2] = [TournamentStatus::Open, TournamentStatus::Ongoing];
}

impl Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Draft => write!(f, "DRAFT"),
            TournamentStatus::Open => write!(f, "OPEN"),
            TournamentStatus::Ongoing => write!(f, "ONGOING"),
            TournamentStatus::Completed => write!(f, "COMPLETED"),
            TournamentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub game: String,
    pub format: TournamentFormat,
    pub max_participants: i64,
    pub prize_pool: Option<f64>,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub status: TournamentStatus,
    pub organizer_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Tournament {
    pub fn has_started(&self, now: i64) -> bool {
        self.start_date <= now
    }
}

/// Field values a tournament must satisfy before it is written.
#[derive(Debug)]
pub struct TournamentDetails<'a> {
    pub name: &'a str,
    pub game: &'a str,
    pub max_participants: i64,
    pub prize_pool: Option<f64>,
    pub start_date: i64,
    pub end_date: Option<i64>,
}

impl TournamentDetails<'_> {
    /// `start_date_changed` is false on updates that keep the stored start date,
    /// so an already running tournament stays editable.
    pub fn validate(&self, now: i64, start_date_changed: bool) -> Result<(), AppError> {
        if self.name.trim().chars().count() < 3 {
            return Err(AppError::InvalidField {
                field: "name",
                reason: "must contain at least 3 characters",
            });
        }
        if self.game.trim().chars().count() < 2 {
            return Err(AppError::InvalidField {
                field: "game",
                reason: "must contain at least 2 characters",
            });
        }
        if self.max_participants <= 0 {
            return Err(AppError::InvalidField {
                field: "maxParticipants",
                reason: "must be positive",
            });
        }
        if self.prize_pool.is_some_and(|pool| pool.is_nan() || pool < 0.0) {
            return Err(AppError::InvalidField {
                field: "prizePool",
                reason: "cannot be negative",
            });
        }
        if start_date_changed && self.start_date <= now {
            return Err(AppError::StartDateNotInFuture);
        }
        if self.end_date.is_some_and(|end| end <= self.start_date) {
            return Err(AppError::EndDateBeforeStart);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_800_000_000;

    fn details() -> TournamentDetails<'static> {
        TournamentDetails {
            name: "Frag Night",
            game: "Quake III",
            max_participants: 16,
            prize_pool: Some(250.0),
            start_date: NOW + 3600,
            end_date: Some(NOW + 7200),
        }
    }

    #[test]
    fn test_terminal_and_active_statuses() {
        assert!(TournamentStatus::Completed.is_terminal());
        assert!(TournamentStatus::Cancelled.is_terminal());
        assert!(!TournamentStatus::Ongoing.is_terminal());
        assert!(!TournamentStatus::ACTIVE.contains(&TournamentStatus::Draft));
        assert!(!TournamentStatus::ACTIVE.contains(&TournamentStatus::Completed));
    }

    #[test]
    fn test_valid_details() {
        assert!(details().validate(NOW, true).is_ok());
    }

    #[test]
    fn test_start_date_must_be_in_the_future() {
        let past = TournamentDetails {
            start_date: NOW,
            end_date: None,
            ..details()
        };
        assert!(matches!(
            past.validate(NOW, true),
            Err(AppError::StartDateNotInFuture)
        ));
        assert!(past.validate(NOW, false).is_ok());
    }

    #[test]
    fn test_end_date_must_follow_start_date() {
        let inverted = TournamentDetails {
            end_date: Some(NOW + 3600),
            ..details()
        };
        assert!(matches!(
            inverted.validate(NOW, true),
            Err(AppError::EndDateBeforeStart)
        ));
    }

    #[test]
    fn test_rejects_negative_prize_pool_and_empty_capacity() {
        let negative = TournamentDetails {
            prize_pool: Some(-1.0),
            ..details()
        };
        assert!(matches!(
            negative.validate(NOW, true),
            Err(AppError::InvalidField {
                field: "prizePool",
                ..
            })
        ));
        let empty = TournamentDetails {
            max_participants: 0,
            ..details()
        };
        assert!(empty.validate(NOW, true).is_err());
    }
}
