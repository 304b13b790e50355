//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod accounts;
pub mod auth;
pub mod doctors;
pub mod health;
