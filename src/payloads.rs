use serde::Deserialize;

use crate::models::{
    booking::BookingStatus,
    registration::RegistrationStatus,
    station::StationStatus,
    tournament::{TournamentFormat, TournamentStatus},
    user::Role,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStation {
    pub name: String,
    pub cpu: String,
    pub gpu: String,
    pub ram: String,
    pub storage: String,
    pub monitor: String,
    pub keyboard: String,
    pub mouse: String,
    pub headset: String,
    #[serde(default)]
    pub status: StationStatus,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StationChanges {
    pub name: Option<String>,
    pub cpu: Option<String>,
    pub gpu: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub monitor: Option<String>,
    pub keyboard: Option<String>,
    pub mouse: Option<String>,
    pub headset: Option<String>,
    pub status: Option<StationStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationFilter {
    pub status: Option<StationStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start: i64,
    pub end: i64,
    pub exclude: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub station_id: i64,
    pub user_id: Option<i64>,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub status: BookingStatus,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingChanges {
    pub station_id: Option<i64>,
    pub user_id: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub status: Option<BookingStatus>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    pub user_id: Option<i64>,
    pub station_id: Option<i64>,
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTournament {
    pub name: String,
    pub game: String,
    pub format: TournamentFormat,
    pub max_participants: i64,
    pub prize_pool: Option<f64>,
    pub start_date: i64,
    pub end_date: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TournamentChanges {
    pub name: Option<String>,
    pub game: Option<String>,
    pub format: Option<TournamentFormat>,
    pub max_participants: Option<i64>,
    pub prize_pool: Option<f64>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TournamentFilter {
    pub status: Option<TournamentStatus>,
    pub game: Option<String>,
    pub format: Option<TournamentFormat>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentStatusPayload {
    pub status: TournamentStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub player_id: Option<i64>,
    pub team_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatusPayload {
    pub status: RegistrationStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    pub tag: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamChanges {
    pub name: Option<String>,
    pub tag: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeamMember {
    pub user_id: i64,
}

/// Used for both creation and full replacement.
#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: String,
    pub genre: String,
    pub release_year: Option<i64>,
    pub min_players: i64,
    pub max_players: i64,
    pub description: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameFilter {
    pub genre: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct UserRolePayload {
    pub role: Role,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}
