use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let error = ErrorResponse {
            error: self.to_string(),
        };

        match self {
            ApiError::InvalidInput(_) => HttpResponse::BadRequest().json(error),
            _ => HttpResponse::InternalServerError().json(error),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Reasons a single generation sweep can fail.
///
/// Only `CredentialMissing` and `AllBackendsExhausted` ever leave the
/// generator; the per-model variants are logged and the sweep moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Backend {model} unavailable: {reason}")]
    BackendUnavailable { model: String, reason: String },

    #[error("Backend {model} rejected the request with status {status}: {body}")]
    BackendRejected {
        model: String,
        status: u16,
        body: String,
    },

    #[error("Backend {model} returned an unusable payload: {reason}")]
    MalformedPayload { model: String, reason: String },

    #[error("No completion API credential configured")]
    CredentialMissing,

    #[error("All {attempted} configured backends failed")]
    AllBackendsExhausted { attempted: usize },
}
