use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    clock::Clock,
    errors::{AppError, is_booking_overlap},
    models::booking::{Booking, BookingStatus, TimeSlot},
    pagination::LimitOffset,
    payloads::{BookingChanges, BookingFilter, NewBooking},
    repositories::{self, auth_repo, booking_repo, station_repo},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPage {
    pub total: i64,
    pub count: usize,
    pub bookings: Vec<Booking>,
}

fn write_error(station_id: i64) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        if is_booking_overlap(&e) {
            tracing::warn!("store rejected overlapping booking on station {}", station_id);
            AppError::StationUnavailable(station_id)
        } else {
            e.into()
        }
    }
}

async fn ensure_station_exists(pool: &SqlitePool, station_id: i64) -> Result<(), AppError> {
    match station_repo::get_station(pool, station_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::StationNotFound(station_id)),
    }
}

/// Whether `[start, end)` on the station is free of non-cancelled bookings,
/// ignoring `exclude` (the booking being moved).
pub async fn check_available(
    pool: &SqlitePool,
    station_id: i64,
    start: i64,
    end: i64,
    exclude: Option<i64>,
) -> Result<bool, AppError> {
    let slot = TimeSlot::new(start, end)?;
    ensure_station_exists(pool, station_id).await?;
    let blocking = booking_repo::find_blocking_booking(pool, station_id, slot, exclude).await?;
    Ok(blocking.is_none())
}

pub async fn create_booking(
    pool: &SqlitePool,
    clock: &dyn Clock,
    requester_id: i64,
    payload: NewBooking,
) -> Result<Booking, AppError> {
    let slot = TimeSlot::new(payload.start_time, payload.end_time)?;
    let user_id = payload.user_id.unwrap_or(requester_id);
    ensure_station_exists(pool, payload.station_id).await?;
    if auth_repo::get_user(pool, user_id).await?.is_none() {
        return Err(AppError::UserNotFound(user_id));
    }
    let mut tx = repositories::begin_write(pool).await?;
    if payload.status.holds_slot() {
        if let Some(blocking) =
            booking_repo::find_blocking_booking(&mut *tx, payload.station_id, slot, None).await?
        {
            tracing::debug!(
                "station {} slot {:?} blocked by booking {}",
                payload.station_id,
                slot,
                blocking.id
            );
            return Err(AppError::StationUnavailable(payload.station_id));
        }
    }
    let booking = booking_repo::create_booking(
        &mut *tx,
        payload.station_id,
        user_id,
        slot,
        payload.status,
        clock.timestamp(),
    )
    .await
    .map_err(write_error(payload.station_id))?;
    tx.commit().await?;
    tracing::info!(
        "booking {} created on station {} for user {}",
        booking.id,
        booking.station_id,
        booking.user_id
    );
    Ok(booking)
}

pub async fn get_booking(pool: &SqlitePool, id: i64) -> Result<Booking, AppError> {
    booking_repo::get_booking(pool, id)
        .await?
        .ok_or(AppError::BookingNotFound(id))
}

pub async fn list_bookings(
    pool: &SqlitePool,
    filter: BookingFilter,
) -> Result<BookingPage, AppError> {
    let page = LimitOffset::new(filter.limit, filter.offset);
    let total = booking_repo::count_bookings(pool, &filter).await?;
    let bookings = booking_repo::list_bookings(pool, &filter, page).await?;
    Ok(BookingPage {
        total,
        count: bookings.len(),
        bookings,
    })
}

pub async fn update_booking(
    pool: &SqlitePool,
    id: i64,
    changes: BookingChanges,
) -> Result<Booking, AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    let current = booking_repo::get_booking(&mut *tx, id)
        .await?
        .ok_or(AppError::BookingNotFound(id))?;
    let slot_changed =
        changes.station_id.is_some() || changes.start_time.is_some() || changes.end_time.is_some();
    let reactivated = !current.status.holds_slot()
        && changes.status.is_some_and(|status| status.holds_slot());
    let updated = Booking {
        station_id: changes.station_id.unwrap_or(current.station_id),
        user_id: changes.user_id.unwrap_or(current.user_id),
        start_time: changes.start_time.unwrap_or(current.start_time),
        end_time: changes.end_time.unwrap_or(current.end_time),
        status: changes.status.unwrap_or(current.status),
        ..current
    };
    let slot = TimeSlot::new(updated.start_time, updated.end_time)?;
    if changes.station_id.is_some()
        && station_repo::get_station(&mut *tx, updated.station_id)
            .await?
            .is_none()
    {
        return Err(AppError::StationNotFound(updated.station_id));
    }
    if changes.user_id.is_some() && auth_repo::get_user(&mut *tx, updated.user_id).await?.is_none()
    {
        return Err(AppError::UserNotFound(updated.user_id));
    }
    if (slot_changed || reactivated) && updated.status.holds_slot() {
        let blocking =
            booking_repo::find_blocking_booking(&mut *tx, updated.station_id, slot, Some(id))
                .await?;
        if blocking.is_some() {
            return Err(AppError::StationUnavailable(updated.station_id));
        }
    }
    let booking = booking_repo::update_booking(&mut *tx, &updated)
        .await
        .map_err(write_error(updated.station_id))?;
    tx.commit().await?;
    Ok(booking)
}

/// Deletes regardless of status; completed bookings can be removed too.
pub async fn remove_booking(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = repositories::begin_write(pool).await?;
    if booking_repo::get_booking(&mut *tx, id).await?.is_none() {
        return Err(AppError::BookingNotFound(id));
    }
    booking_repo::delete_booking(&mut *tx, id).await?;
    tx.commit().await?;
    tracing::info!("booking {} deleted", id);
    Ok(())
}
