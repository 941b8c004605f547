//! Response handling and error translation.
//!
//! # Responsibilities
//! - Map validation, process and upstream errors to HTTP status codes
//! - Render every failure as `{"error": <message>, "details": <optional>}`
//!
//! # Status mapping
//! ```text
//! client input (missing/out of range/malformed)  → 400
//! missing file                                   → 404
//! script failure, bad output, missing credential → 500
//! upstream non-success                           → upstream status, relayed
//! upstream shape mismatch                        → 500
//! deadline exceeded                              → 504
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::predict::{CoordinateError, PredictionError};
use crate::upstream::UpstreamError;

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// A failed request, ready to be rendered.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::debug!(status = %self.status, error = %self.message, "Request failed");
        }
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CoordinateError> for ApiError {
    fn from(e: CoordinateError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        match e {
            PredictionError::Failed { details, .. } => {
                ApiError::internal("Prediction failed").with_details(details)
            }
            PredictionError::Parse { .. } => ApiError::internal("Failed to parse prediction result"),
            PredictionError::Timeout(_) => ApiError::gateway_timeout("Prediction timed out"),
            PredictionError::Spawn(_) | PredictionError::Unavailable => {
                ApiError::internal("Internal server error").with_details(e.to_string())
            }
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::NotConfigured(message) => ApiError::internal(message),
            UpstreamError::Rejected {
                status,
                message,
                details,
            } => ApiError::new(status, message).with_details(details),
            UpstreamError::UnexpectedShape { message, details } => {
                ApiError::internal(message).with_details(details)
            }
            UpstreamError::TooLarge { .. } => ApiError::internal("Audio response exceeded size limit"),
            UpstreamError::Timeout => ApiError::gateway_timeout("Upstream request timed out"),
            UpstreamError::InvalidUrl(_) | UpstreamError::Transport(_) => {
                ApiError::internal("Internal server error").with_details(e.to_string())
            }
        }
    }
}
