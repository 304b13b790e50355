//! Axum extractors for request handling
//!
//! Custom extractors for the bearer credential, request scope, query
//! strings, path ids and validated bodies.

mod auth;
mod query;
mod validated;

pub use auth::{BearerToken, Scoped};
pub use query::{AccessTokenParams, DoctorSearchParams, IdPath, QueryParams};
pub use validated::ValidatedJson;
