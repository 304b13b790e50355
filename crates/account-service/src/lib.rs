//! # account-service
//!
//! Application layer containing the authentication and account use cases,
//! the per-request scope, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccountService, AuthService, BearerIdentity, RequestScope, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
