//! Service context - dependency container for services
//!
//! Holds the application-wide ports. Per-request state lives in
//! [`RequestScope`], created from the context for every inbound request.

use std::sync::Arc;

use account_core::traits::{Clock, CredentialCodec, Database, PasswordHasher};
use chrono::Duration;

use super::error::{ServiceError, ServiceResult};
use super::scope::RequestScope;

/// Service context containing all application-wide dependencies
#[derive(Clone)]
pub struct ServiceContext {
    database: Arc<dyn Database>,
    codec: Arc<dyn CredentialCodec>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        database: Arc<dyn Database>,
        codec: Arc<dyn CredentialCodec>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            database,
            codec,
            hasher,
            clock,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Open a unit of work for one request carrying an optional bearer credential
    pub async fn scope(&self, bearer: Option<String>) -> ServiceResult<RequestScope> {
        let uow = self.database.begin().await?;
        Ok(RequestScope::new(self.clone(), uow, bearer))
    }

    pub fn database(&self) -> &dyn Database {
        self.database.as_ref()
    }

    pub fn codec(&self) -> &dyn CredentialCodec {
        self.codec.as_ref()
    }

    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Lifetime of access credentials
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Lifetime of refresh credentials
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    database: Option<Arc<dyn Database>>,
    codec: Option<Arc<dyn CredentialCodec>>,
    hasher: Option<Arc<dyn PasswordHasher>>,
    clock: Option<Arc<dyn Clock>>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            database: None,
            codec: None,
            hasher: None,
            clock: None,
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }

    pub fn database(mut self, database: Arc<dyn Database>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn codec(mut self, codec: Arc<dyn CredentialCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a dependency is missing or a TTL is not positive
    pub fn build(self) -> ServiceResult<ServiceContext> {
        if self.access_ttl <= Duration::zero() || self.refresh_ttl <= Duration::zero() {
            return Err(ServiceError::validation("token lifetimes must be positive"));
        }

        Ok(ServiceContext::new(
            self.database
                .ok_or_else(|| ServiceError::validation("database is required"))?,
            self.codec
                .ok_or_else(|| ServiceError::validation("codec is required"))?,
            self.hasher
                .ok_or_else(|| ServiceError::validation("hasher is required"))?,
            self.clock
                .ok_or_else(|| ServiceError::validation("clock is required"))?,
            self.access_ttl,
            self.refresh_ttl,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
