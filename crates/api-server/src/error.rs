//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leadboard_core::LeadboardError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Error returned by every handler: a status plus a JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        metrics::counter!("api.validation_errors").increment(1);
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    pub fn unauthorized(error: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error, message)
    }
}

impl From<LeadboardError> for ApiError {
    fn from(err: LeadboardError) -> Self {
        if err.is_client_error() {
            warn!(error = %err, "Request rejected");
            return Self::bad_request(err.code(), err.to_string());
        }
        match err {
            LeadboardError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, err.code(), err.to_string())
            }
            _ => {
                error!(error = %err, "Request failed");
                metrics::counter!("api.errors").increment(1);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.code(),
                    "Internal processing error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
