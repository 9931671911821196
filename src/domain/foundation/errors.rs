//! Error types for the domain layer.
//!
//! Two tiers:
//!
//! - [`DomainError`] is what ports return. Its [`ErrorCode`] lets the
//!   application layer recognise the handful of outcomes it recovers from
//!   locally (`NotFound` on coordinator shipping, `PreconditionFailed` on
//!   payment updates).
//! - [`ServiceError`] is what crosses the service boundary. It carries only
//!   the error kind and a message; storage and gateway error types stay hidden.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Lookup errors
    NotFound,

    // State errors
    PreconditionFailed,
    Forbidden,

    // Infrastructure errors
    DatabaseError,
    CacheError,
    ExternalServiceError,
    InternalError,

    Unknown,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::PreconditionFailed => "PRECONDITION_FAILED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a not-found error for a named resource.
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
            .with_detail("resource", resource)
    }

    /// Creates a precondition-failed error, the outcome of a rejected conditional write.
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PreconditionFailed, message)
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns true when the error is exactly a not-found outcome.
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }

    /// Returns true when a conditional write was rejected.
    pub fn is_precondition_failed(&self) -> bool {
        self.code == ErrorCode::PreconditionFailed
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

/// Classified error returned by application handlers.
///
/// | Kind | HTTP Status |
/// |------|-------------|
/// | InvalidArgument | 400 |
/// | Forbidden | 403 |
/// | NotFound | 404 |
/// | FailedPrecondition | 412 |
/// | Internal | 500 |
/// | Unknown | 500 |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl ServiceError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        ServiceError::FailedPrecondition(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::Internal(message.into())
    }

    /// Wraps an infrastructure failure, keeping only its message.
    pub fn internal_from(err: impl fmt::Display) -> Self {
        ServiceError::Internal(err.to_string())
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::FailedPrecondition(_) => "FAILED_PRECONDITION",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Internal(_) => "INTERNAL",
            ServiceError::Unknown(_) => "UNKNOWN",
        }
    }

    /// Returns the message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::InvalidArgument(m)
            | ServiceError::Forbidden(m)
            | ServiceError::FailedPrecondition(m)
            | ServiceError::NotFound(m)
            | ServiceError::Internal(m)
            | ServiceError::Unknown(m) => m,
        }
    }

    /// Returns true for errors caused by the caller's request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidArgument(_)
                | ServiceError::Forbidden(_)
                | ServiceError::FailedPrecondition(_)
                | ServiceError::NotFound(_)
        )
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => ServiceError::InvalidArgument(err.message),
            ErrorCode::NotFound => ServiceError::NotFound(err.message),
            ErrorCode::PreconditionFailed => ServiceError::FailedPrecondition(err.message),
            ErrorCode::Forbidden => ServiceError::Forbidden(err.message),
            ErrorCode::DatabaseError
            | ErrorCode::CacheError
            | ErrorCode::ExternalServiceError
            | ErrorCode::InternalError => ServiceError::Internal(err.to_string()),
            ErrorCode::Unknown => ServiceError::Unknown(err.to_string()),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::InvalidArgument(err.to_string())
    }
}
