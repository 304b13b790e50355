//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use account_core::{Role, RoleSet};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// ============================================================================
// Authentication Requests
// ============================================================================

/// Self-registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 64, message = "First name must be 1-64 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 64, message = "Last name must be 1-64 characters"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
}

/// Credential exchange request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
}

/// Refresh credential rotation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken", alias = "refresh_token")]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

// ============================================================================
// Account Requests
// ============================================================================

/// Profile update for the calling account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 64, message = "First name must be 1-64 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 64, message = "Last name must be 1-64 characters"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
}

/// Administrator create/update request
///
/// `password` is required on create. On update an empty password keeps the
/// stored hash.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AccountRequest {
    #[validate(length(min = 1, max = 64, message = "First name must be 1-64 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 64, message = "Last name must be 1-64 characters"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "At least one role is required"))]
    #[schema(value_type = Vec<Role>)]
    pub roles: RoleSet,
}

// ============================================================================
// Paging
// ============================================================================

/// Offset paging as sent by clients, before clamping
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Rows to skip, negative values count as 0
    pub from: Option<i64>,
    /// Page size, clamped to 1..=100 (default 10)
    pub count: Option<i64>,
}

impl PageRequest {
    pub const DEFAULT_COUNT: i64 = 10;
    pub const MAX_COUNT: i64 = 100;

    pub fn new(from: i64, count: i64) -> Self {
        Self {
            from: Some(from),
            count: Some(count),
        }
    }

    /// Offset, never negative
    pub fn offset(&self) -> i64 {
        self.from.unwrap_or(0).max(0)
    }

    /// Page size clamped to `1..=MAX_COUNT`
    pub fn limit(&self) -> i64 {
        self.count
            .unwrap_or(Self::DEFAULT_COUNT)
            .clamp(1, Self::MAX_COUNT)
    }
}
