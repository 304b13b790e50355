//! Test fixtures and data generators
//!
//! Provides reusable request bodies and response shapes for integration tests.

use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Username that no other test uses
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}{}", unique_suffix())
}

/// Seeded demo accounts: (username, password)
pub const ADMIN: (&str, &str) = ("admin", "admin");
pub const MANAGER: (&str, &str) = ("manager", "manager");
pub const DOCTOR: (&str, &str) = ("doctor", "doctor");
pub const USER: (&str, &str) = ("user", "user");

/// Self-registration body
pub fn sign_up_body(first_name: &str, last_name: &str, username: &str, password: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": last_name,
        "username": username,
        "password": password,
    })
}

/// Sign-in body
pub fn sign_in_body(username: &str, password: &str) -> Value {
    json!({ "username": username, "password": password })
}

/// Administrator create/update body
pub fn account_body(
    first_name: &str,
    last_name: &str,
    username: &str,
    password: &str,
    roles: &[&str],
) -> Value {
    json!({
        "first_name": first_name,
        "last_name": last_name,
        "username": username,
        "password": password,
        "roles": roles,
    })
}

/// Credential pair
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// Account summary
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub roles: Vec<String>,
    pub is_active: bool,
}

/// Decoded access-token payload
#[derive(Debug, Clone, Deserialize)]
pub struct Payload {
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

/// Plain acknowledgement
#[derive(Debug, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
