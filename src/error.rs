// Error types for the API server and their conversion into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API server error types. Rendered as plain-text responses so callers get
/// the failure message directly in the body.
#[derive(Debug)]
pub enum ApiError {
    // Request carried invalid or missing parameters
    BadRequest(String),
    // Policy rejection by the folder limit gate
    Forbidden(&'static str),
    // The folder walk itself failed (missing path, permissions, I/O)
    ScanFailed(std::io::Error),
    // Miscellaneous server-side failures (e.g. a blocking task panicked)
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.to_string()),
            Self::ScanFailed(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, message).into_response()
    }
}

// Walk failures propagate with `?` from handlers and the gate.
impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::ScanFailed(err)
    }
}
