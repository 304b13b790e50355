//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs

pub mod requests;
pub mod responses;

pub use requests::{
    AccountRequest, PageRequest, RefreshTokenRequest, SignInRequest, SignUpRequest,
    UpdateMeRequest,
};
pub use responses::{
    CredentialsResponse, HealthChecks, HealthResponse, MessageResponse, ReadinessResponse,
};
