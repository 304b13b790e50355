//! Identity introspection from a bearer credential

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use account_core::entities::{RoleSet, TokenPayload, User};
use account_core::error::DomainError;
use account_core::traits::{CredentialCodec, IdentityProvider, UserRepository};

/// Resolves the caller from the request's bearer credential.
///
/// Roles come from the credential itself, so they may lag the stored
/// user by at most one access-token lifetime.
pub struct BearerIdentity<'a> {
    codec: &'a dyn CredentialCodec,
    users: &'a dyn UserRepository,
    bearer: Option<&'a str>,
}

impl<'a> BearerIdentity<'a> {
    pub fn new(
        codec: &'a dyn CredentialCodec,
        users: &'a dyn UserRepository,
        bearer: Option<&'a str>,
    ) -> Self {
        Self {
            codec,
            users,
            bearer,
        }
    }

    fn payload(&self) -> Result<TokenPayload, DomainError> {
        let raw = self.bearer.ok_or(DomainError::NotAuthenticated)?;
        self.codec
            .introspect(raw)
            .map(|credential| credential.payload)
            .map_err(|e| {
                debug!(error = %e, "Bearer credential rejected");
                DomainError::NotAuthenticated
            })
    }
}

#[async_trait]
impl IdentityProvider for BearerIdentity<'_> {
    async fn current_user_id(&self) -> Result<Uuid, DomainError> {
        self.payload().map(|payload| payload.user_id)
    }

    async fn current_roles(&self) -> Result<RoleSet, DomainError> {
        self.payload().map(|payload| payload.roles)
    }

    async fn current_user(&self) -> Result<User, DomainError> {
        let user_id = self.current_user_id().await?;
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => {
                debug!(%user_id, "Credential subject no longer resolves to an active user");
                Err(DomainError::NotAuthenticated)
            }
        }
    }

    async fn is_authenticated(&self) -> bool {
        self.payload().is_ok()
    }
}
