pub mod auth;
pub mod bookings;
pub mod games;
pub mod registrations;
pub mod stations;
pub mod teams;
pub mod tournaments;
pub mod users;
