use agate_service::ServiceError;
use agate_store::StoreError;
use agate_types::{EntityKind, ErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Startup and serving failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A failed request, rendered as `{"error": <message>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A path identifier did not parse as an integer.
    #[error("invalid {0} ID")]
    InvalidId(EntityKind),

    /// The JSON body did not decode into the expected shape.
    #[error("invalid request body")]
    InvalidBody { detail: String },

    /// The request outlived `request_timeout_ms`.
    #[error("request timed out")]
    Timeout,

    /// A middleware layer failed before a handler produced a response.
    #[error("internal error: {0}")]
    Middleware(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidId(_) | Self::InvalidBody { .. } => ErrorKind::InvalidArgument,
            Self::Timeout | Self::Middleware(_) => ErrorKind::Internal,
            Self::Service(err) => err.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            _ => status_for(self.kind()),
        }
    }
}

/// The one place failure kinds become HTTP status codes.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ConstraintViolation | ErrorKind::StoreUnavailable | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        match &self {
            Self::InvalidBody { detail } => {
                tracing::warn!(%status, %detail, "request body rejected");
            }
            _ if status.is_server_error() => {
                tracing::error!(%status, kind = %self.kind(), error = %message, "request failed");
            }
            _ => tracing::warn!(%status, kind = %self.kind(), error = %message, "request rejected"),
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
