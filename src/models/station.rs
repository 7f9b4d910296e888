use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Informational only, availability comes from bookings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StationStatus {
    #[default]
    Available,
    Maintenance,
    Booked,
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub cpu: String,
    pub gpu: String,
    pub ram: String,
    pub storage: String,
    pub monitor: String,
    pub keyboard: String,
    pub mouse: String,
    pub headset: String,
    pub status: StationStatus,
}
