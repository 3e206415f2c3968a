use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Body returned for any server-side failure without a handler-specific message
pub const GENERIC_SERVER_ERROR: &str = "Server Error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Server-side failure carrying the message shown to the caller
    #[error("{0}")]
    ServerFailure(String),
}

impl AppError {
    /// Replace a server-side error with `message` for the response body.
    ///
    /// The original error is logged here. Client errors (4xx) are kept as-is.
    pub fn with_failure_message(self, message: &str) -> Self {
        match self {
            AppError::NotFound(_)
            | AppError::BadRequest(_)
            | AppError::PayloadTooLarge(_)
            | AppError::ServerFailure(_) => self,
            other => {
                tracing::error!("{}: {:?}", message, other);
                AppError::ServerFailure(message.to_string())
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::ServerFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                GENERIC_SERVER_ERROR.to_string()
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                GENERIC_SERVER_ERROR.to_string()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                GENERIC_SERVER_ERROR.to_string()
            }
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::ServerFailure(msg) => msg,
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
