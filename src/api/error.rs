//! Request-time errors and their JSON envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while handling a question request.
///
/// Every variant renders as `{"error": ..., "success": false}`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Missing or empty question.
    #[error("{0}")]
    Validation(String),
    /// The agent reported a failure; the message is passed through.
    #[error("{0}")]
    Agent(String),
    /// Anything else; the message is wrapped.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Agent(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub success: bool,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.message(),
            success: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorEnvelope::from(&self))).into_response()
    }
}
