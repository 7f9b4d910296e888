use sqlx::SqliteExecutor;

use crate::{
    models::booking::{Booking, BookingStatus, TimeSlot},
    pagination::LimitOffset,
    payloads::BookingFilter,
};

/// First non-cancelled booking on `station_id` overlapping `slot`, ignoring `exclude`.
pub async fn find_blocking_booking<'e>(
    executor: impl SqliteExecutor<'e>,
    station_id: i64,
    slot: TimeSlot,
    exclude: Option<i64>,
) -> sqlx::Result<Option<Booking>> {
    sqlx::query_as(
        "select * from bookings
            where station_id = ?1
              and status <> ?2
              and start_time < ?4
              and ?3 < end_time
              and (?5 is null or id <> ?5)
            order by start_time asc
            limit 1",
    )
    .bind(station_id)
    .bind(BookingStatus::Cancelled)
    .bind(slot.start())
    .bind(slot.end())
    .bind(exclude)
    .fetch_optional(executor)
    .await
}

pub async fn create_booking<'e>(
    executor: impl SqliteExecutor<'e>,
    station_id: i64,
    user_id: i64,
    slot: TimeSlot,
    status: BookingStatus,
    now: i64,
) -> sqlx::Result<Booking> {
    sqlx::query_as(
        "insert into bookings (station_id, user_id, start_time, end_time, status, created_at)
            values (?1, ?2, ?3, ?4, ?5, ?6)
            returning *",
    )
    .bind(station_id)
    .bind(user_id)
    .bind(slot.start())
    .bind(slot.end())
    .bind(status)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn get_booking<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<Booking>> {
    sqlx::query_as("select * from bookings where id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn update_booking<'e>(
    executor: impl SqliteExecutor<'e>,
    booking: &Booking,
) -> sqlx::Result<Booking> {
    sqlx::query_as(
        "update bookings set
            station_id = ?1,
            user_id = ?2,
            start_time = ?3,
            end_time = ?4,
            status = ?5
        where id = ?6
        returning *",
    )
    .bind(booking.station_id)
    .bind(booking.user_id)
    .bind(booking.start_time)
    .bind(booking.end_time)
    .bind(booking.status)
    .bind(booking.id)
    .fetch_one(executor)
    .await
}

pub async fn delete_booking<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("delete from bookings where id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_bookings<'e>(
    executor: impl SqliteExecutor<'e>,
    filter: &BookingFilter,
    page: LimitOffset,
) -> sqlx::Result<Vec<Booking>> {
    sqlx::query_as(
        "select * from bookings
            where (?1 is null or user_id = ?1)
              and (?2 is null or station_id = ?2)
              and (?3 is null or status = ?3)
            order by start_time asc
            limit ?4 offset ?5",
    )
    .bind(filter.user_id)
    .bind(filter.station_id)
    .bind(filter.status)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

pub async fn count_bookings<'e>(
    executor: impl SqliteExecutor<'e>,
    filter: &BookingFilter,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "select count(*) from bookings
            where (?1 is null or user_id = ?1)
              and (?2 is null or station_id = ?2)
              and (?3 is null or status = ?3)",
    )
    .bind(filter.user_id)
    .bind(filter.station_id)
    .bind(filter.status)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
mod tests {
    use crate::errors::is_booking_overlap;

    use super::*;

    const T14: i64 = 1_900_000_000;
    const HOUR: i64 = 3600;

    fn slot(from: i64, to: i64) -> TimeSlot {
        TimeSlot::new(from, to).expect("valid slot")
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "stations")))]
    async fn test_store_rejects_overlapping_insert(pool: sqlx::SqlitePool) {
        create_booking(
            &pool,
            1,
            3,
            slot(T14, T14 + 2 * HOUR),
            BookingStatus::Confirmed,
            0,
        )
        .await
        .expect("failed to create booking");
        let err = create_booking(
            &pool,
            1,
            4,
            slot(T14 + HOUR, T14 + 3 * HOUR),
            BookingStatus::Confirmed,
            0,
        )
        .await
        .expect_err("overlapping booking was accepted by the store");
        assert!(is_booking_overlap(&err));
        create_booking(
            &pool,
            1,
            4,
            slot(T14 + 2 * HOUR, T14 + 4 * HOUR),
            BookingStatus::Confirmed,
            0,
        )
        .await
        .expect("touching booking should be accepted");
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "stations")))]
    async fn test_blocking_lookup_ignores_cancelled_and_excluded(pool: sqlx::SqlitePool) {
        let cancelled = create_booking(
            &pool,
            1,
            3,
            slot(T14, T14 + 2 * HOUR),
            BookingStatus::Cancelled,
            0,
        )
        .await
        .expect("failed to create booking");
        let wanted = slot(T14 + HOUR, T14 + 3 * HOUR);
        let blocking = find_blocking_booking(&pool, 1, wanted, None)
            .await
            .expect("failed to query bookings");
        assert!(blocking.is_none());

        let confirmed = create_booking(&pool, 1, 3, wanted, BookingStatus::Confirmed, 0)
            .await
            .expect("failed to create booking");
        let blocking = find_blocking_booking(&pool, 1, wanted, None)
            .await
            .expect("failed to query bookings");
        assert_eq!(blocking.map(|b| b.id), Some(confirmed.id));
        let blocking = find_blocking_booking(&pool, 1, wanted, Some(confirmed.id))
            .await
            .expect("failed to query bookings");
        assert!(blocking.is_none());
        assert_ne!(cancelled.id, confirmed.id);
    }
}
