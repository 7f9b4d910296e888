pub mod booking;
pub mod game;
pub mod registration;
pub mod station;
pub mod team;
pub mod tournament;
pub mod user;
