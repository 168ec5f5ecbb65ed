use serde::Serialize;
use warp::{
    Rejection, Reply,
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::{InvalidQuery, MethodNotAllowed, Reject, UnsupportedMediaType},
};

use tracing::{Level, event, instrument};

#[derive(Debug)]
pub enum Error {
    ParseError(std::num::ParseIntError),
    MissingParameters,
    InvalidId(i32),
    InvalidEncoding(std::string::FromUtf8Error),
    UnknownCategory(String),
    CategoryNotFound(i32),
    NotFound,
    InvalidDifficulty(i64),
    DatabaseQueryError(sqlx::Error),
    ConfigError(config::ConfigError),
}

impl Error {
    /// The HTTP status a rejection carrying this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::ParseError(_)
            | Error::MissingParameters
            | Error::InvalidId(_)
            | Error::InvalidEncoding(_)
            | Error::UnknownCategory(_) => StatusCode::BAD_REQUEST,
            Error::CategoryNotFound(_) | Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidDifficulty(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::DatabaseQueryError(_) | Error::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ParseError(err) => {
                write!(f, "Cannot parse parameter: {}", err)
            }
            Error::MissingParameters => {
                write!(f, "Missing parameters")
            }
            Error::InvalidId(id) => {
                write!(f, "Invalid question id: {}", id)
            }
            Error::InvalidEncoding(err) => {
                write!(f, "Path segment is not valid UTF-8: {}", err)
            }
            Error::UnknownCategory(category) => {
                write!(f, "Unknown category: {}", category)
            }
            Error::CategoryNotFound(id) => {
                write!(f, "Category {} not found", id)
            }
            Error::NotFound => {
                write!(f, "No matching questions")
            }
            Error::InvalidDifficulty(difficulty) => {
                write!(f, "Difficulty {} is outside 1..=5", difficulty)
            }
            Error::DatabaseQueryError(_) => {
                write!(f, "Cannot query or update data")
            }
            Error::ConfigError(err) => {
                write!(f, "Cannot load configuration: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

/// Body of every failed response.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

impl ErrorResponse {
    pub fn new(status: StatusCode) -> Self {
        ErrorResponse {
            success: false,
            error: status.as_u16(),
            message: message_for(status),
        }
    }
}

fn message_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request.",
        StatusCode::FORBIDDEN => "Forbidden.",
        StatusCode::NOT_FOUND => "Item not found.",
        StatusCode::METHOD_NOT_ALLOWED => "Method Not Allowed",
        StatusCode::UNPROCESSABLE_ENTITY => "Request could not be processed.",
        _ => "Internal Server Error.",
    }
}

fn error_reply(status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&ErrorResponse::new(status)), status)
}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        match error {
            Error::DatabaseQueryError(e) => {
                event!(Level::ERROR, "Database query error: {:?}", e);
            }
            Error::ConfigError(e) => {
                event!(Level::ERROR, "Configuration error: {}", e);
            }
            _ => {
                event!(Level::WARN, "{}", error);
            }
        }
        Ok(error_reply(error.status()))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::WARN, "Cannot deserialize request body: {}", error);
        Ok(error_reply(StatusCode::BAD_REQUEST))
    } else if let Some(error) = r.find::<InvalidQuery>() {
        event!(Level::WARN, "Cannot parse query string: {}", error);
        Ok(error_reply(StatusCode::BAD_REQUEST))
    } else if let Some(error) = r.find::<UnsupportedMediaType>() {
        event!(Level::WARN, "Unsupported request body: {}", error);
        Ok(error_reply(StatusCode::BAD_REQUEST))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::ERROR, "CORS forbidden error: {}", error);
        Ok(error_reply(StatusCode::FORBIDDEN))
    } else if r.find::<MethodNotAllowed>().is_some() {
        event!(Level::WARN, "Method not allowed on this route");
        Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED))
    } else if r.is_not_found() {
        event!(Level::WARN, "Requested route was not found");
        Ok(error_reply(StatusCode::NOT_FOUND))
    } else {
        event!(Level::ERROR, "Unhandled rejection: {:?}", r);
        Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR))
    }
}
