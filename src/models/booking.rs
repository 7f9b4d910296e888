use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::errors::AppError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Cancelled bookings release their slot; every other status holds it.
    pub fn holds_slot(&self) -> bool {
        *self != BookingStatus::Cancelled
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A half-open `[start, end)` window, in unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    start: i64,
    end: i64,
}

impl TimeSlot {
    pub fn new(start: i64, end: i64) -> Result<Self, AppError> {
        if start >= end {
            return Err(AppError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub station_id: i64,
    pub user_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub status: BookingStatus,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_or_inverted_slots() {
        assert!(matches!(
            TimeSlot::new(10, 10),
            Err(AppError::InvalidTimeRange { start: 10, end: 10 })
        ));
        assert!(TimeSlot::new(11, 10).is_err());
    }

    #[test]
    fn test_only_cancelled_bookings_release_their_slot() {
        assert!(BookingStatus::Confirmed.holds_slot());
        assert!(BookingStatus::Completed.holds_slot());
        assert!(!BookingStatus::Cancelled.holds_slot());
    }
}
