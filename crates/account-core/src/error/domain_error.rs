//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Access denied: {0} role required")]
    AccessDenied(String),

    // =========================================================================
    // Not Found / Gone Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("User already deleted: {0}")]
    AlreadyDeleted(Uuid),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already in use: {0}")]
    UsernameExists(String),

    /// A session this unit removed was removed by another unit first
    #[error("Refresh session already consumed: {0}")]
    SessionConsumed(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Authentication
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",

            // Authorization
            Self::AccessDenied(_) => "ACCESS_DENIED",

            // Not Found / Gone
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::AlreadyDeleted(_) => "ALREADY_DELETED",

            // Conflict
            Self::UsernameExists(_) => "USERNAME_EXISTS",
            Self::SessionConsumed(_) => "SESSION_CONSUMED",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a credential decoding failure (expired counts as invalid)
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::InvalidToken(_) | Self::TokenExpired)
    }

    /// Check if the caller failed to prove who they are
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated
                | Self::AuthenticationFailed
                | Self::InvalidRefreshToken
                | Self::InvalidToken(_)
                | Self::TokenExpired
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AccessDenied(_))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    /// Check if the target existed but is no longer live
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::AlreadyDeleted(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameExists(_) | Self::SessionConsumed(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}
