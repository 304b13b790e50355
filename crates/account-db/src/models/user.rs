//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection of the users table served to the account reader
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub roles: Vec<String>,
    pub is_active: bool,
}
