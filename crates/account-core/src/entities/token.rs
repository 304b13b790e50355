//! Token payload and issued credential

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::{Role, RoleSet};

/// Claim set embedded in every bearer credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenPayload {
    pub user_id: Uuid,
    #[schema(value_type = Vec<Role>)]
    pub roles: RoleSet,
}

impl TokenPayload {
    pub fn new(user_id: Uuid, roles: RoleSet) -> Self {
        Self { user_id, roles }
    }
}

/// A signed, time-bounded bearer credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Opaque encoded string handed to clients
    pub value: String,
    pub payload: TokenPayload,
    pub expires_at: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
}
