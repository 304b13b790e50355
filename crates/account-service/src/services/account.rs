//! Account service
//!
//! Self-profile read and update, administrator account management and the
//! doctor directory.

use account_core::entities::{AccountFilter, AccountInfo, AccountQuery, Role, User};
use account_core::error::DomainError;
use account_core::traits::IdentityProvider;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{AccountRequest, PageRequest, UpdateMeRequest};

use super::error::{ServiceError, ServiceResult};
use super::scope::RequestScope;

/// Account service
pub struct AccountService<'a> {
    scope: &'a RequestScope,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService
    pub fn new(scope: &'a RequestScope) -> Self {
        Self { scope }
    }

    // ========================================================================
    // Caller's own account
    // ========================================================================

    /// Summary of the calling account
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> ServiceResult<AccountInfo> {
        let user_id = self.scope.identity().current_user_id().await?;

        self.scope
            .uow()
            .accounts()
            .read_one(&AccountFilter::by_id(user_id))
            .await?
            .ok_or_else(|| DomainError::NotAuthenticated.into())
    }

    /// Update name and username of the calling account. Roles are untouched.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn update_me(&self, request: UpdateMeRequest) -> ServiceResult<()> {
        let mut user = self.scope.identity().current_user().await?;

        self.ensure_username_free(&request.username, Some(user.id))
            .await?;

        user.rename(
            request.first_name,
            request.last_name,
            request.username,
            self.scope.ctx().clock().now(),
        );
        self.scope.uow().users().update(&user).await?;
        self.scope.uow().commit().await?;

        info!(user_id = %user.id, "Profile updated");
        Ok(())
    }

    // ========================================================================
    // Administration
    // ========================================================================

    /// Page of every account, inactive ones included
    #[instrument(skip(self))]
    pub async fn all_accounts(&self, page: PageRequest) -> ServiceResult<Vec<AccountInfo>> {
        self.require_role(Role::Admin).await?;

        let query = AccountQuery::new(
            AccountFilter::default().including_inactive(),
            page.offset(),
            page.limit(),
        );
        Ok(self.scope.uow().accounts().read_many(&query).await?)
    }

    /// Create an account with explicit roles
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_account(&self, request: AccountRequest) -> ServiceResult<()> {
        self.require_role(Role::Admin).await?;
        Self::check_roles(&request)?;

        if request.password.is_empty() {
            return Err(ServiceError::validation("Password is required"));
        }

        self.ensure_username_free(&request.username, None).await?;

        let ctx = self.scope.ctx();
        let password_hash = ctx.hasher().hash(&request.password)?;
        let user = User::new(
            request.first_name,
            request.last_name,
            request.username,
            password_hash,
            request.roles,
            ctx.clock().now(),
        );

        self.scope.uow().users().add(&user).await?;
        self.scope.uow().commit().await?;

        info!(user_id = %user.id, "Account created");
        Ok(())
    }

    /// Overwrite an account's profile and roles, and its password when one
    /// is supplied
    #[instrument(skip(self, request), fields(user_id = %id))]
    pub async fn update_account(&self, id: Uuid, request: AccountRequest) -> ServiceResult<()> {
        self.require_role(Role::Admin).await?;
        Self::check_roles(&request)?;

        let mut user = self.load_user(id).await?;
        self.ensure_username_free(&request.username, Some(user.id))
            .await?;

        let ctx = self.scope.ctx();
        let now = ctx.clock().now();
        user.rename(request.first_name, request.last_name, request.username, now);
        user.set_roles(request.roles, now);
        if !request.password.is_empty() {
            user.set_password_hash(ctx.hasher().hash(&request.password)?, now);
        }

        self.scope.uow().users().update(&user).await?;
        self.scope.uow().commit().await?;

        info!("Account updated");
        Ok(())
    }

    /// Soft delete: the account becomes inactive and its sessions are dropped
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_account(&self, id: Uuid) -> ServiceResult<()> {
        self.require_role(Role::Admin).await?;

        let mut user = self.load_user(id).await?;
        if !user.is_active {
            return Err(DomainError::AlreadyDeleted(id).into());
        }

        user.deactivate(self.scope.ctx().clock().now());
        self.scope.uow().users().update(&user).await?;
        let dropped = self
            .scope
            .uow()
            .refresh_sessions()
            .remove_for_user(id)
            .await?;
        self.scope.uow().commit().await?;

        info!(dropped_sessions = dropped, "Account deleted");
        Ok(())
    }

    // ========================================================================
    // Doctor directory
    // ========================================================================

    /// Page of active doctors, optionally filtered by full name
    #[instrument(skip(self))]
    pub async fn all_doctors(
        &self,
        page: PageRequest,
        name_filter: Option<String>,
    ) -> ServiceResult<Vec<AccountInfo>> {
        self.require_authenticated().await?;

        let filter = AccountFilter::default()
            .with_role(Role::Doctor)
            .with_name_filter(name_filter);
        let query = AccountQuery::new(filter, page.offset(), page.limit());
        Ok(self.scope.uow().accounts().read_many(&query).await?)
    }

    /// A single active doctor
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn doctor_identified(&self, id: Uuid) -> ServiceResult<AccountInfo> {
        self.require_authenticated().await?;

        let filter = AccountFilter::by_id(id).with_role(Role::Doctor);
        self.scope
            .uow()
            .accounts()
            .read_one(&filter)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id).into())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn require_authenticated(&self) -> ServiceResult<()> {
        if self.scope.identity().is_authenticated().await {
            Ok(())
        } else {
            Err(DomainError::NotAuthenticated.into())
        }
    }

    /// Roles come from the credential, so a revoked role stays usable until
    /// the access token expires
    async fn require_role(&self, role: Role) -> ServiceResult<()> {
        let roles = self.scope.identity().current_roles().await?;
        if roles.contains(&role) {
            Ok(())
        } else {
            warn!(required = %role, "Access denied");
            Err(DomainError::AccessDenied(role.to_string()).into())
        }
    }

    /// Direct callers bypass `Validate`, so the empty role set is refused here too
    fn check_roles(request: &AccountRequest) -> ServiceResult<()> {
        if request.roles.is_empty() {
            let reason = "At least one role is required".to_string();
            return Err(DomainError::ValidationError(reason).into());
        }
        Ok(())
    }

    async fn load_user(&self, id: Uuid) -> ServiceResult<User> {
        self.scope
            .uow()
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id).into())
    }

    /// Fail if `username` belongs to an account other than `owner`
    async fn ensure_username_free(&self, username: &str, owner: Option<Uuid>) -> ServiceResult<()> {
        match self.scope.uow().users().find_by_username(username).await? {
            Some(holder) if Some(holder.id) != owner => {
                warn!("Username already taken");
                Err(DomainError::UsernameExists(username.to_string()).into())
            }
            _ => Ok(()),
        }
    }
}
