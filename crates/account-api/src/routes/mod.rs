//! Route definitions
//!
//! Account routes are mounted under /api; health probes sit at the root.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{accounts, auth, doctors, health};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately so they
/// bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(authentication_routes())
        .merge(account_routes())
        .merge(doctor_routes())
}

/// Authentication routes
fn authentication_routes() -> Router<AppState> {
    Router::new()
        .route("/Authentication/SignUp", post(auth::sign_up))
        .route("/Authentication/SignIn", post(auth::sign_in))
        .route("/Authentication/SignOut", put(auth::sign_out))
        .route("/Authentication/Validate", get(auth::validate))
        .route("/Authentication/Refresh", post(auth::refresh))
}

/// Account routes
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/Accounts/Me", get(accounts::get_me))
        .route("/Accounts/Update", put(accounts::update_me))
        .route(
            "/Accounts",
            get(accounts::all_accounts).post(accounts::create_account),
        )
        .route(
            "/Accounts/:id",
            put(accounts::update_account).delete(accounts::delete_account),
        )
}

/// Doctor directory routes
fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/Doctors", get(doctors::all_doctors))
        .route("/Doctors/:id", get(doctors::doctor_identified))
}
