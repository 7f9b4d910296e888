use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::{errors::AppError, models::tournament::TournamentFormat};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
    Withdrawn,
}

impl Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Pending => write!(f, "PENDING"),
            RegistrationStatus::Confirmed => write!(f, "CONFIRMED"),
            RegistrationStatus::Rejected => write!(f, "REJECTED"),
            RegistrationStatus::Withdrawn => write!(f, "WITHDRAWN"),
        }
    }
}

/// Who a registration enrolls: an individual player or a whole team.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Participant {
    Player(i64),
    Team(i64),
}

impl Participant {
    pub fn from_ids(player_id: Option<i64>, team_id: Option<i64>) -> Result<Self, AppError> {
        match (player_id, team_id) {
            (Some(id), None) => Ok(Self::Player(id)),
            (None, Some(id)) => Ok(Self::Team(id)),
            _ => Err(AppError::InvalidParticipant),
        }
    }

    pub fn fits(&self, format: TournamentFormat) -> bool {
        matches!(
            (self, format),
            (Participant::Player(_), TournamentFormat::Solo)
                | (Participant::Team(_), TournamentFormat::Team)
        )
    }

    pub fn player_id(&self) -> Option<i64> {
        match self {
            Participant::Player(id) => Some(*id),
            Participant::Team(_) => None,
        }
    }

    pub fn team_id(&self) -> Option<i64> {
        match self {
            Participant::Team(id) => Some(*id),
            Participant::Player(_) => None,
        }
    }
}

impl Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Participant::Player(id) => write!(f, "player {}", id),
            Participant::Team(id) => write!(f, "team {}", id),
        }
    }
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    pub tournament_id: i64,
    pub player_id: Option<i64>,
    pub team_id: Option<i64>,
    pub status: RegistrationStatus,
    pub registered_at: i64,
    pub confirmed_at: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
#[serde(tag = "kind")]
pub enum ParticipantDetails {
    Player { id: i64, username: String },
    Team { id: i64, name: String, tag: String },
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetails {
    #[serde(flatten)]
    pub registration: Registration,
    pub participant: ParticipantDetails,
}
