//! Refresh session entity - one outstanding refresh credential

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::token::Credential;

/// A stored refresh credential.
///
/// The token string identifies at most one live session. Sessions are
/// removed on sign-out and replaced on refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshSession {
    /// Build a session from a freshly issued refresh credential
    pub fn from_credential(credential: &Credential) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: credential.payload.user_id,
            refresh_token: credential.value.clone(),
            expires_at: credential.expires_at,
            created_at: credential.issued_at,
        }
    }

    /// Check if the session is expired at `now`
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
