//! Authentication service
//!
//! Handles registration, credential exchange, sign-out, access-token
//! validation and refresh-token rotation.

use account_core::entities::{RefreshSession, TokenPayload, User};
use account_core::error::DomainError;
use account_core::traits::IdentityProvider;
use tracing::{debug, info, instrument, warn};

use crate::dto::{CredentialsResponse, SignInRequest, SignUpRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::scope::RequestScope;

/// Well-formed Argon2id hash that matches no password. Unknown usernames are
/// verified against it so they cost as much as a wrong password.
const DECOY_PASSWORD_HASH: &str = concat!(
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA",
    "$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
);

/// Authentication service
pub struct AuthService<'a> {
    scope: &'a RequestScope,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(scope: &'a RequestScope) -> Self {
        Self { scope }
    }

    /// Register a new account holding only the USER role. Issues no tokens.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn sign_up(&self, request: SignUpRequest) -> ServiceResult<()> {
        let ctx = self.scope.ctx();
        let users = self.scope.uow().users();

        if users.username_exists(&request.username).await? {
            warn!("Sign-up rejected: username taken");
            return Err(DomainError::UsernameExists(request.username).into());
        }

        let password_hash = ctx.hasher().hash(&request.password)?;
        let user = User::standard(
            request.first_name,
            request.last_name,
            request.username,
            password_hash,
            ctx.clock().now(),
        );

        users.add(&user).await?;
        self.scope.uow().commit().await?;

        info!(user_id = %user.id, "User signed up");
        Ok(())
    }

    /// Exchange username and password for a fresh credential pair.
    ///
    /// Any previous refresh sessions of the user are dropped.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn sign_in(&self, request: SignInRequest) -> ServiceResult<CredentialsResponse> {
        let ctx = self.scope.ctx();

        let found = self
            .scope
            .uow()
            .users()
            .find_by_username(&request.username)
            .await?;
        let stored_hash = found
            .as_ref()
            .map_or(DECOY_PASSWORD_HASH, |user| user.password_hash.as_str());
        let verified = ctx.hasher().verify(&request.password, stored_hash);

        let user = match found {
            Some(user) if verified => user,
            _ => {
                warn!("Sign-in failed: bad credentials");
                return Err(DomainError::AuthenticationFailed.into());
            }
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Sign-in failed: account deleted");
            return Err(DomainError::AuthenticationFailed.into());
        }

        let sessions = self.scope.uow().refresh_sessions();
        let dropped = sessions.remove_for_user(user.id).await?;
        let credentials = self.issue_pair(&user).await?;
        self.scope.uow().commit().await?;

        info!(user_id = %user.id, dropped_sessions = dropped, "User signed in");
        Ok(credentials)
    }

    /// Drop the caller's live refresh session.
    ///
    /// Signing out without a live session succeeds without touching the store.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> ServiceResult<()> {
        let user_id = self.scope.identity().current_user_id().await?;
        let sessions = self.scope.uow().refresh_sessions();

        let Some(session) = sessions.find_by_user_id(user_id).await? else {
            debug!(%user_id, "Sign-out without a session");
            return Ok(());
        };

        if session.is_expired_at(self.scope.ctx().clock().now()) {
            debug!(%user_id, "Sign-out with an expired session");
            return Ok(());
        }

        sessions.remove(session.id).await?;
        match self.scope.uow().commit().await {
            Ok(()) => info!(%user_id, "User signed out"),
            Err(DomainError::SessionConsumed(_)) => {
                debug!(%user_id, "Sign-out raced a refresh; session already gone");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Introspect an access token. Needs no unit of work.
    #[instrument(skip(ctx, access_token))]
    pub fn validate(ctx: &ServiceContext, access_token: &str) -> ServiceResult<TokenPayload> {
        let credential = ctx.codec().introspect(access_token)?;
        Ok(credential.payload)
    }

    /// Rotate a refresh token into a new credential pair.
    ///
    /// The presented session is consumed even when rotation fails.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<CredentialsResponse> {
        let sessions = self.scope.uow().refresh_sessions();

        let Some(session) = sessions.find_by_token(refresh_token).await? else {
            warn!("Refresh rejected: unknown token");
            return Err(DomainError::InvalidRefreshToken.into());
        };

        // A concurrent refresh may have consumed the row after our lookup
        if !sessions.remove(session.id).await? {
            warn!("Refresh rejected: token already consumed");
            return Err(DomainError::InvalidRefreshToken.into());
        }

        match self.rotate(&session).await {
            Ok(credentials) => match self.scope.uow().commit().await {
                Ok(()) => {
                    info!(user_id = %session.user_id, "Refresh token rotated");
                    Ok(credentials)
                }
                Err(DomainError::SessionConsumed(_)) => {
                    warn!(user_id = %session.user_id, "Refresh rejected: consumed concurrently");
                    Err(DomainError::InvalidRefreshToken.into())
                }
                Err(e) => Err(e.into()),
            },
            Err(err) => {
                if let Err(commit_err) = self.scope.uow().commit().await {
                    warn!(error = %commit_err, "Could not commit consumed refresh session");
                }
                Err(err)
            }
        }
    }

    async fn rotate(&self, session: &RefreshSession) -> ServiceResult<CredentialsResponse> {
        if session.is_expired_at(self.scope.ctx().clock().now()) {
            warn!(user_id = %session.user_id, "Refresh rejected: session expired");
            return Err(DomainError::InvalidRefreshToken.into());
        }

        let user = match self.scope.uow().users().find_by_id(session.user_id).await? {
            Some(user) if user.is_active => user,
            _ => {
                warn!(user_id = %session.user_id, "Refresh rejected: owner gone");
                return Err(DomainError::InvalidRefreshToken.into());
            }
        };

        self.issue_pair(&user).await
    }

    /// Issue access and refresh credentials from the stored roles and
    /// persist the refresh session.
    async fn issue_pair(&self, user: &User) -> ServiceResult<CredentialsResponse> {
        let ctx = self.scope.ctx();
        let payload = TokenPayload::new(user.id, user.roles.clone());

        let access = ctx.codec().issue(&payload, ctx.access_ttl())?;
        let refresh = ctx.codec().issue(&payload, ctx.refresh_ttl())?;

        self.scope
            .uow()
            .refresh_sessions()
            .add(&RefreshSession::from_credential(&refresh))
            .await?;

        Ok(CredentialsResponse {
            access_token: access.value,
            refresh_token: refresh.value,
        })
    }
}
