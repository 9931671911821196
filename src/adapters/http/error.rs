//! Maps application errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use super::dto::ErrorResponse;
use crate::application::handlers::payment::WebhookError;
use crate::domain::foundation::{ServiceError, ValidationError};

/// API error type that converts service errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    InvalidSignature,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Service(err.into())
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::InvalidSignature => Self::InvalidSignature,
            WebhookError::Service(e) => Self::Service(e),
        }
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidSignature => (StatusCode::UNAUTHORIZED, "INVALID_WEBHOOK_SIGNATURE"),
            ApiError::Service(e) => match e {
                ServiceError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
                ServiceError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                ServiceError::FailedPrecondition(_) => {
                    (StatusCode::PRECONDITION_FAILED, "FAILED_PRECONDITION")
                }
                ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ServiceError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
                ServiceError::Unknown(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UNKNOWN_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        // Server-side details stay in the logs.
        let message = match &self {
            ApiError::InvalidSignature => "Webhook signature is invalid".to_string(),
            ApiError::Service(e) if e.is_client_error() => e.to_string(),
            ApiError::Service(_) => {
                tracing::error!(error = ?self, "request failed");
                "An internal error occurred".to_string()
            }
        };

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
