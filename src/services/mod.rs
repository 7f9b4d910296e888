pub mod account_service;
pub mod booking_service;
pub mod game_service;
pub mod registration_service;
pub mod station_service;
pub mod team_service;
pub mod tournament_service;
