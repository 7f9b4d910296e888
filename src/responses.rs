use axum::{
    Json as AxumJson,
    extract::{
        FromRequest, FromRequestParts, Query as AxumQuery, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    errors::{AppError, ErrorKind},
    models::{
        booking::Booking,
        game::Game,
        registration::{Registration, RegistrationDetails},
        station::Station,
        team::TeamDetails,
        tournament::Tournament,
        user::User,
    },
    services::{
        booking_service::BookingPage, game_service::GamePage, station_service::StationPage,
        tournament_service::TournamentPage,
    },
};

#[derive(Debug, Serialize)]
#[serde(tag = "status")]
#[serde(rename_all = "camelCase")]
pub enum AppResponse {
    Error { error: ErrorResponse },
    Success { payload: SuccessResponse },
}

pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    AxumJson<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(json) => Ok(Json(json.0)),
            Err(rej) => match rej {
                JsonRejection::JsonDataError(e) => Err(AppError::JsonDataError(e.body_text())),
                JsonRejection::JsonSyntaxError(e) => Err(AppError::JsonSyntaxError(e.to_string())),
                JsonRejection::MissingJsonContentType(_) => Err(AppError::MissingContentType),
                _ => Err(AppError::JsonUnknownError),
            },
        }
    }
}

pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        AxumQuery::<T>::from_request_parts(parts, state)
            .await
            .map(|query| Query(query.0))
            .map_err(|rej: QueryRejection| AppError::InvalidQuery(rej.body_text()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing)]
    pub status_code: StatusCode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[serde(rename_all_fields = "camelCase")]
#[serde(tag = "type")]
pub enum SuccessResponse {
    UserCreated {
        user: User,
    },
    LoginSuccess {
        token: String,
        user: User,
    },
    Profile {
        user: User,
    },
    UserList {
        total: usize,
        users: Vec<User>,
    },
    StationData {
        station: Station,
    },
    StationList {
        total: i64,
        count: usize,
        stations: Vec<Station>,
    },
    StationAvailability {
        station_id: i64,
        start: i64,
        end: i64,
        available: bool,
    },
    BookingData {
        booking: Booking,
    },
    BookingList {
        total: i64,
        count: usize,
        bookings: Vec<Booking>,
    },
    GameData {
        game: Game,
    },
    GameList {
        total: i64,
        count: usize,
        games: Vec<Game>,
    },
    TournamentData {
        tournament: Tournament,
    },
    TournamentList {
        data: Vec<Tournament>,
        total: i64,
        page: i64,
    },
    RegistrationData {
        registration: Registration,
    },
    RegistrationList {
        tournament_id: i64,
        registrations: Vec<RegistrationDetails>,
    },
    TeamData {
        team: TeamDetails,
    },
    TeamList {
        teams: Vec<TeamDetails>,
    },
    Deleted {
        id: i64,
    },
}

impl From<SuccessResponse> for AppResponse {
    fn from(payload: SuccessResponse) -> Self {
        Self::Success { payload }
    }
}

impl From<Station> for AppResponse {
    fn from(station: Station) -> Self {
        SuccessResponse::StationData { station }.into()
    }
}

impl From<StationPage> for AppResponse {
    fn from(value: StationPage) -> Self {
        SuccessResponse::StationList {
            total: value.total,
            count: value.count,
            stations: value.stations,
        }
        .into()
    }
}

impl From<Booking> for AppResponse {
    fn from(booking: Booking) -> Self {
        SuccessResponse::BookingData { booking }.into()
    }
}

impl From<BookingPage> for AppResponse {
    fn from(value: BookingPage) -> Self {
        SuccessResponse::BookingList {
            total: value.total,
            count: value.count,
            bookings: value.bookings,
        }
        .into()
    }
}

impl From<Vec<User>> for AppResponse {
    fn from(users: Vec<User>) -> Self {
        SuccessResponse::UserList {
            total: users.len(),
            users,
        }
        .into()
    }
}

impl From<Game> for AppResponse {
    fn from(game: Game) -> Self {
        SuccessResponse::GameData { game }.into()
    }
}

impl From<GamePage> for AppResponse {
    fn from(value: GamePage) -> Self {
        SuccessResponse::GameList {
            total: value.total,
            count: value.count,
            games: value.games,
        }
        .into()
    }
}

impl From<Tournament> for AppResponse {
    fn from(tournament: Tournament) -> Self {
        SuccessResponse::TournamentData { tournament }.into()
    }
}

impl From<TournamentPage> for AppResponse {
    fn from(value: TournamentPage) -> Self {
        SuccessResponse::TournamentList {
            data: value.data,
            total: value.total,
            page: value.page,
        }
        .into()
    }
}

impl From<Registration> for AppResponse {
    fn from(registration: Registration) -> Self {
        SuccessResponse::RegistrationData { registration }.into()
    }
}

impl From<TeamDetails> for AppResponse {
    fn from(team: TeamDetails) -> Self {
        SuccessResponse::TeamData { team }.into()
    }
}

impl From<Vec<TeamDetails>> for AppResponse {
    fn from(teams: Vec<TeamDetails>) -> Self {
        SuccessResponse::TeamList { teams }.into()
    }
}

impl IntoResponse for AppResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppResponse::Error { error: e } => {
                (e.status_code, AxumJson(AppResponse::Error { error: e })).into_response()
            }
            AppResponse::Success { payload: _ } => (StatusCode::OK, AxumJson(self)).into_response(),
        }
    }
}

impl From<ErrorKind> for StatusCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let kind = self.kind();
        let message = if kind == ErrorKind::Internal {
            tracing::error!("internal error: {:?}", self);
            String::from("Internal server error")
        } else {
            format!("{}", self)
        };
        AppResponse::Error {
            error: ErrorResponse {
                code: self.code(),
                message,
                status_code: kind.into(),
            },
        }
        .into_response()
    }
}
