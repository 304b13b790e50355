//! Request scope - one unit of work plus the caller's bearer credential

use account_core::traits::UnitOfWork;

use super::context::ServiceContext;
use super::identity::BearerIdentity;

/// Everything a service needs to handle a single request.
///
/// Dropping the scope without a commit discards its writes.
pub struct RequestScope {
    ctx: ServiceContext,
    uow: Box<dyn UnitOfWork>,
    bearer: Option<String>,
}

impl RequestScope {
    pub fn new(ctx: ServiceContext, uow: Box<dyn UnitOfWork>, bearer: Option<String>) -> Self {
        Self { ctx, uow, bearer }
    }

    pub fn ctx(&self) -> &ServiceContext {
        &self.ctx
    }

    pub fn uow(&self) -> &dyn UnitOfWork {
        self.uow.as_ref()
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    /// Identity introspector bound to this scope's credential and stores
    pub fn identity(&self) -> BearerIdentity<'_> {
        BearerIdentity::new(self.ctx.codec(), self.uow.users(), self.bearer())
    }
}

impl std::fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestScope")
            .field("has_bearer", &self.bearer.is_some())
            .finish_non_exhaustive()
    }
}
