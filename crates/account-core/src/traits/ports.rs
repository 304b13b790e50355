//! Non-storage ports: time, password hashing, credentials and caller identity

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::entities::{Credential, RoleSet, TokenPayload, User};
use crate::error::DomainError;

/// Source of the current UTC time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into an opaque string
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a plaintext password against a stored hash.
    /// A malformed hash verifies as `false`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Encodes payloads into signed bearer strings and back
pub trait CredentialCodec: Send + Sync {
    /// Sign `payload` with `issued_at = now` and `expires_at = now + ttl`
    fn issue(&self, payload: &TokenPayload, ttl: Duration) -> Result<Credential, DomainError>;

    /// Verify and decode a bearer string.
    ///
    /// Fails with [`DomainError::InvalidToken`] on any structural or
    /// signature problem and [`DomainError::TokenExpired`] once `now >= exp`.
    fn introspect(&self, raw: &str) -> Result<Credential, DomainError>;
}

/// Caller identity resolved from the request's bearer credential
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user_id(&self) -> Result<Uuid, DomainError>;

    async fn current_roles(&self) -> Result<RoleSet, DomainError>;

    /// Stored, active user behind the credential
    async fn current_user(&self) -> Result<User, DomainError>;

    /// Never fails
    async fn is_authenticated(&self) -> bool;
}
