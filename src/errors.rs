use thiserror::Error;

use crate::models::{registration::RegistrationStatus, tournament::TournamentFormat};

/// Broad failure classes the transport layer maps onto status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Forbidden,
    Conflict,
    Unauthorized,
    UnsupportedMediaType,
    Internal,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("The authentication header is missing or invalid")]
    InvalidAuthHeader,
    #[error("The provided jwt is invalid or has expired, please reauthenticate")]
    TokenInvalid,
    #[error("Login Failed: {0}")]
    LoginFailed(String),
    #[error("Insufficient permissions to perform this action")]
    InsufficientPermissions,
    #[error("Only the team captain can modify this team")]
    NotTeamCaptain,
    #[error("Unknown JSON Error")]
    JsonUnknownError,
    #[error("Missing JSON content-type header")]
    MissingContentType,
    #[error("JSON Syntax error: {0}")]
    JsonSyntaxError(String),
    #[error("Invalid JSON data: {0}")]
    JsonDataError(String),
    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),
    #[error("Invalid field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Start time `{start}` must be strictly before end time `{end}`")]
    InvalidTimeRange { start: i64, end: i64 },
    #[error("Tournament start date must be in the future")]
    StartDateNotInFuture,
    #[error("Tournament end date must be after its start date")]
    EndDateBeforeStart,
    #[error("Cannot open a tournament whose start date has already passed")]
    CannotOpenPastTournament,
    #[error("A registration must reference exactly one of playerId or teamId")]
    InvalidParticipant,
    #[error("A {0} tournament requires a {1} registration")]
    ParticipantMismatch(TournamentFormat, &'static str),
    #[error("Administrators cannot delete their own account")]
    CannotDeleteSelf,
    #[error("Administrators cannot change their own role")]
    CannotChangeOwnRole,
    #[error("Username already exists: {0}")]
    UsernameTaken(String),
    #[error("Email already in use: {0}")]
    EmailTaken(String),
    #[error("Station `{0}` is already booked for this time slot")]
    StationUnavailable(i64),
    #[error("Tournament `{0}` is not open for registration")]
    TournamentNotOpen(i64),
    #[error("Tournament `{0}` has reached its maximum number of participants")]
    TournamentFull(i64),
    #[error("Participant is already registered to tournament `{0}`")]
    AlreadyRegistered(i64),
    #[error("Tournament `{0}` is completed or cancelled and can no longer be edited")]
    TournamentLocked(i64),
    #[error("Cannot delete tournament `{0}` while it has confirmed registrations")]
    TournamentHasConfirmedRegistrations(i64),
    #[error("Registration `{0}` is {1} and can no longer be cancelled")]
    RegistrationNotPending(i64, RegistrationStatus),
    #[error("Cannot delete team `{0}` while it is registered to an open or ongoing tournament")]
    TeamInActiveTournament(i64),
    #[error("User `{0}` is already a member of this team")]
    AlreadyTeamMember(i64),
    #[error("The captain cannot be removed from the team")]
    CannotRemoveCaptain,
    #[error("User `{0}` still organizes tournaments or captains a team")]
    UserHasDependents(i64),
    #[error("Station with id `{0}` does not exist")]
    StationNotFound(i64),
    #[error("Booking with id `{0}` does not exist")]
    BookingNotFound(i64),
    #[error("Tournament with id `{0}` does not exist")]
    TournamentNotFound(i64),
    #[error("Team with id `{0}` does not exist")]
    TeamNotFound(i64),
    #[error("Registration with id `{0}` does not exist")]
    RegistrationNotFound(i64),
    #[error("Game with id `{0}` does not exist")]
    GameNotFound(i64),
    #[error("User with id `{0}` does not exist")]
    UserNotFound(i64),
    #[error("User `{0}` is not a member of this team")]
    NotTeamMember(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("unknown error")]
    Unknown,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidAuthHeader | AppError::TokenInvalid | AppError::LoginFailed(_) => {
                ErrorKind::Unauthorized
            }
            AppError::InsufficientPermissions | AppError::NotTeamCaptain => ErrorKind::Forbidden,
            AppError::MissingContentType => ErrorKind::UnsupportedMediaType,
            AppError::JsonUnknownError
            | AppError::JsonSyntaxError(_)
            | AppError::JsonDataError(_)
            | AppError::InvalidQuery(_)
            | AppError::InvalidField { .. }
            | AppError::InvalidTimeRange { .. }
            | AppError::StartDateNotInFuture
            | AppError::EndDateBeforeStart
            | AppError::CannotOpenPastTournament
            | AppError::InvalidParticipant
            | AppError::ParticipantMismatch(..)
            | AppError::CannotDeleteSelf
            | AppError::CannotChangeOwnRole => ErrorKind::BadRequest,
            AppError::UsernameTaken(_)
            | AppError::EmailTaken(_)
            | AppError::StationUnavailable(_)
            | AppError::TournamentNotOpen(_)
            | AppError::TournamentFull(_)
            | AppError::AlreadyRegistered(_)
            | AppError::TournamentLocked(_)
            | AppError::TournamentHasConfirmedRegistrations(_)
            | AppError::RegistrationNotPending(..)
            | AppError::TeamInActiveTournament(_)
            | AppError::AlreadyTeamMember(_)
            | AppError::CannotRemoveCaptain
            | AppError::UserHasDependents(_) => ErrorKind::Conflict,
            AppError::StationNotFound(_)
            | AppError::BookingNotFound(_)
            | AppError::TournamentNotFound(_)
            | AppError::TeamNotFound(_)
            | AppError::RegistrationNotFound(_)
            | AppError::GameNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::NotTeamMember(_) => ErrorKind::NotFound,
            AppError::Database(_) | AppError::Unknown => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> String {
        match self {
            AppError::InvalidAuthHeader => String::from("InvalidAuthHeader"),
            AppError::TokenInvalid => String::from("TokenInvalid"),
            AppError::LoginFailed(_) => String::from("LoginFailed"),
            AppError::InsufficientPermissions => String::from("InsufficientPermissions"),
            AppError::NotTeamCaptain => String::from("NotTeamCaptain"),
            AppError::JsonUnknownError => String::from("JsonUnknownError"),
            AppError::MissingContentType => String::from("MissingContentType"),
            AppError::JsonSyntaxError(_) => String::from("JsonSyntaxError"),
            AppError::JsonDataError(_) => String::from("JsonDataError"),
            AppError::InvalidQuery(_) => String::from("InvalidQuery"),
            AppError::InvalidField { .. } => String::from("InvalidField"),
            AppError::InvalidTimeRange { .. } => String::from("InvalidTimeRange"),
            AppError::StartDateNotInFuture => String::from("StartDateNotInFuture"),
            AppError::EndDateBeforeStart => String::from("EndDateBeforeStart"),
            AppError::CannotOpenPastTournament => String::from("CannotOpenPastTournament"),
            AppError::InvalidParticipant => String::from("InvalidParticipant"),
            AppError::ParticipantMismatch(..) => String::from("ParticipantMismatch"),
            AppError::CannotDeleteSelf => String::from("CannotDeleteSelf"),
            AppError::CannotChangeOwnRole => String::from("CannotChangeOwnRole"),
            AppError::UsernameTaken(_) => String::from("UsernameTaken"),
            AppError::EmailTaken(_) => String::from("EmailTaken"),
            AppError::StationUnavailable(_) => String::from("StationUnavailable"),
            AppError::TournamentNotOpen(_) => String::from("TournamentNotOpen"),
            AppError::TournamentFull(_) => String::from("TournamentFull"),
            AppError::AlreadyRegistered(_) => String::from("AlreadyRegistered"),
            AppError::TournamentLocked(_) => String::from("TournamentLocked"),
            AppError::TournamentHasConfirmedRegistrations(_) => {
                String::from("TournamentHasConfirmedRegistrations")
            }
            AppError::RegistrationNotPending(..) => String::from("RegistrationNotPending"),
            AppError::TeamInActiveTournament(_) => String::from("TeamInActiveTournament"),
            AppError::AlreadyTeamMember(_) => String::from("AlreadyTeamMember"),
            AppError::CannotRemoveCaptain => String::from("CannotRemoveCaptain"),
            AppError::UserHasDependents(_) => String::from("UserHasDependents"),
            AppError::StationNotFound(_) => String::from("StationNotFound"),
            AppError::BookingNotFound(_) => String::from("BookingNotFound"),
            AppError::TournamentNotFound(_) => String::from("TournamentNotFound"),
            AppError::TeamNotFound(_) => String::from("TeamNotFound"),
            AppError::RegistrationNotFound(_) => String::from("RegistrationNotFound"),
            AppError::GameNotFound(_) => String::from("GameNotFound"),
            AppError::UserNotFound(_) => String::from("UserNotFound"),
            AppError::NotTeamMember(_) => String::from("NotTeamMember"),
            AppError::Database(_) => String::from("DatabaseError"),
            AppError::Unknown => String::from("Unknown"),
        }
    }
}

/// Message raised by the booking overlap triggers in the schema.
const BOOKING_OVERLAP: &str = "booking_overlap";

pub fn is_booking_overlap(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.message().contains(BOOKING_OVERLAP),
        _ => false,
    }
}

pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

pub fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}
