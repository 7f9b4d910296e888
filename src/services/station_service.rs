use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    errors::AppError,
    models::station::Station,
    pagination::LimitOffset,
    payloads::{NewStation, StationChanges, StationFilter},
    repositories::station_repo,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationPage {
    pub total: i64,
    pub count: usize,
    pub stations: Vec<Station>,
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(AppError::InvalidField {
            field,
            reason: "is required",
        });
    }
    if len > max {
        return Err(AppError::InvalidField {
            field,
            reason: "is too long",
        });
    }
    Ok(())
}

fn validate_specs(specs: [(&'static str, &str); 9]) -> Result<(), AppError> {
    for (field, value) in specs {
        let max = if field == "ram" { 50 } else { 100 };
        check_length(field, value, max)?;
    }
    Ok(())
}

pub async fn create_station(pool: &SqlitePool, payload: NewStation) -> Result<Station, AppError> {
    validate_specs([
        ("name", payload.name.as_str()),
        ("cpu", payload.cpu.as_str()),
        ("gpu", payload.gpu.as_str()),
        ("ram", payload.ram.as_str()),
        ("storage", payload.storage.as_str()),
        ("monitor", payload.monitor.as_str()),
        ("keyboard", payload.keyboard.as_str()),
        ("mouse", payload.mouse.as_str()),
        ("headset", payload.headset.as_str()),
    ])?;
    let station = station_repo::create_station(pool, &payload).await?;
    tracing::info!("station {} ({}) created", station.id, station.name);
    Ok(station)
}

pub async fn get_station(pool: &SqlitePool, id: i64) -> Result<Station, AppError> {
    station_repo::get_station(pool, id)
        .await?
        .ok_or(AppError::StationNotFound(id))
}

pub async fn list_stations(
    pool: &SqlitePool,
    filter: StationFilter,
) -> Result<StationPage, AppError> {
    let page = LimitOffset::new(filter.limit, filter.offset);
    let total = station_repo::count_stations(pool, filter.status).await?;
    let stations = station_repo::list_stations(pool, filter.status, page).await?;
    Ok(StationPage {
        total,
        count: stations.len(),
        stations,
    })
}

pub async fn update_station(
    pool: &SqlitePool,
    id: i64,
    changes: StationChanges,
) -> Result<Station, AppError> {
    let current = get_station(pool, id).await?;
    let updated = Station {
        id,
        name: changes.name.unwrap_or(current.name),
        cpu: changes.cpu.unwrap_or(current.cpu),
        gpu: changes.gpu.unwrap_or(current.gpu),
        ram: changes.ram.unwrap_or(current.ram),
        storage: changes.storage.unwrap_or(current.storage),
        monitor: changes.monitor.unwrap_or(current.monitor),
        keyboard: changes.keyboard.unwrap_or(current.keyboard),
        mouse: changes.mouse.unwrap_or(current.mouse),
        headset: changes.headset.unwrap_or(current.headset),
        status: changes.status.unwrap_or(current.status),
    };
    validate_specs([
        ("name", updated.name.as_str()),
        ("cpu", updated.cpu.as_str()),
        ("gpu", updated.gpu.as_str()),
        ("ram", updated.ram.as_str()),
        ("storage", updated.storage.as_str()),
        ("monitor", updated.monitor.as_str()),
        ("keyboard", updated.keyboard.as_str()),
        ("mouse", updated.mouse.as_str()),
        ("headset", updated.headset.as_str()),
    ])?;
    Ok(station_repo::update_station(pool, &updated).await?)
}

pub async fn remove_station(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    if station_repo::delete_station(pool, id).await? == 0 {
        return Err(AppError::StationNotFound(id));
    }
    tracing::info!("station {} deleted", id);
    Ok(())
}
