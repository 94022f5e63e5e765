use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use freehub_engine::{MarketError, StorageError};
use log::*;
use thiserror::Error;

use crate::data_objects::JsonResponse;

/// What clients see in place of the details of a 5xx error, outside of development mode.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    InvalidRequestPath(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
    #[error("{0}")]
    NoRecordFound(String),
    #[error("{0}")]
    InsufficientPermissions(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::InvalidState(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::CouldNotIssueToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNAUTHORIZED,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Always carries the full error message. See [`crate::server::internal_error_filter`] for how 5xx details are
    /// kept from clients.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::to_string(&JsonResponse::<()>::failure(self)).unwrap_or_default())
    }
}

impl From<MarketError> for ServerError {
    fn from(e: MarketError) -> Self {
        match e {
            MarketError::InvalidInput(s) => {
                debug!("💻️ Rejected request: {s}");
                Self::InvalidInput(s)
            },
            MarketError::InvalidState(s) => {
                debug!("💻️ Request conflicts with the current state: {s}");
                Self::InvalidState(s)
            },
            MarketError::Forbidden(s) => {
                debug!("💻️ Forbidden: {s}");
                Self::InsufficientPermissions(s)
            },
            MarketError::NotFound(s) => {
                debug!("💻️ Not found: {s}");
                Self::NoRecordFound(s)
            },
            MarketError::StorageError(e) => Self::from(e),
        }
    }
}

impl From<StorageError> for ServerError {
    fn from(e: StorageError) -> Self {
        error!("💻️ Storage error while handling request. {e}");
        Self::BackendError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Authentication required. No bearer token was provided.")]
    MissingToken,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Could not issue an access token. {0}")]
    CouldNotIssueToken(String),
}
