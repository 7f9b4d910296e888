use sqlx::SqliteExecutor;

use crate::{
    models::station::{Station, StationStatus},
    pagination::LimitOffset,
    payloads::NewStation,
};

pub async fn create_station<'e>(
    executor: impl SqliteExecutor<'e>,
    station: &NewStation,
) -> sqlx::Result<Station> {
    sqlx::query_as(
        "insert into stations
            (name, cpu, gpu, ram, storage, monitor, keyboard, mouse, headset, status)
            values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            returning *",
    )
    .bind(&station.name)
    .bind(&station.cpu)
    .bind(&station.gpu)
    .bind(&station.ram)
    .bind(&station.storage)
    .bind(&station.monitor)
    .bind(&station.keyboard)
    .bind(&station.mouse)
    .bind(&station.headset)
    .bind(station.status)
    .fetch_one(executor)
    .await
}

pub async fn get_station<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<Station>> {
    sqlx::query_as("select * from stations where id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_stations<'e>(
    executor: impl SqliteExecutor<'e>,
    status: Option<StationStatus>,
    page: LimitOffset,
) -> sqlx::Result<Vec<Station>> {
    sqlx::query_as(
        "select * from stations
            where (?1 is null or status = ?1)
            order by name asc
            limit ?2 offset ?3",
    )
    .bind(status)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(executor)
    .await
}

pub async fn count_stations<'e>(
    executor: impl SqliteExecutor<'e>,
    status: Option<StationStatus>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar("select count(*) from stations where (?1 is null or status = ?1)")
        .bind(status)
        .fetch_one(executor)
        .await
}

pub async fn update_station<'e>(
    executor: impl SqliteExecutor<'e>,
    station: &Station,
) -> sqlx::Result<Station> {
    sqlx::query_as(
        "update stations set
            name = ?1,
            cpu = ?2,
            gpu = ?3,
            ram = ?4,
            storage = ?5,
            monitor = ?6,
            keyboard = ?7,
            mouse = ?8,
            headset = ?9,
            status = ?10
        where id = ?11
        returning *",
    )
    .bind(&station.name)
    .bind(&station.cpu)
    .bind(&station.gpu)
    .bind(&station.ram)
    .bind(&station.storage)
    .bind(&station.monitor)
    .bind(&station.keyboard)
    .bind(&station.mouse)
    .bind(&station.headset)
    .bind(station.status)
    .bind(station.id)
    .fetch_one(executor)
    .await
}

pub async fn delete_station<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("delete from stations where id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
