//! Application error types
//!
//! Every failure that reaches the transport layer is an `AppError`.

use account_core::DomainError;
use serde::Serialize;
use utoipa::ToSchema;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request-level validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage setup failure (pool, migrations)
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Invalid or missing configuration at startup
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Database(_) | Self::Internal(_) | Self::Config(_) => 500,
            Self::Domain(e) if e.is_authentication() => 401,
            Self::Domain(e) if e.is_authorization() => 403,
            Self::Domain(e) if e.is_not_found() => 404,
            Self::Domain(e) if e.is_conflict() => 409,
            Self::Domain(e) if e.is_gone() => 410,
            Self::Domain(e) if e.is_validation() => 400,
            Self::Domain(_) => 500,
        }
    }

    /// Stable machine-readable error code
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Message safe to show a client. Infrastructure causes are masked.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Domain(DomainError::DatabaseError(_)) => {
                "Database error".to_string()
            }
            Self::Domain(DomainError::InternalError(_)) | Self::Config(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Error payload returned to API clients
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable machine-readable code, e.g. `TOKEN_EXPIRED`
    pub code: String,
    pub message: String,
    /// Field-level validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.public_message(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
