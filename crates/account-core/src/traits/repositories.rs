//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. All three stores of one unit of work share
//! a single transaction and observe each other's writes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{AccountFilter, AccountInfo, AccountQuery, RefreshSession, User};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    async fn add(&self, user: &User) -> RepoResult<()>;

    /// Save every mutable field of an existing user
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Find user by ID (inactive users included)
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Find user by exact username (inactive users included)
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if a username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Check if a user with this ID exists
    async fn exists(&self, id: Uuid) -> RepoResult<bool>;
}

// ============================================================================
// Refresh Session Repository
// ============================================================================

#[async_trait]
pub trait RefreshSessionRepository: Send + Sync {
    /// Persist a new session
    async fn add(&self, session: &RefreshSession) -> RepoResult<()>;

    /// Remove a session by ID, returning whether a row was removed.
    /// Removing an absent session is a no-op.
    async fn remove(&self, id: Uuid) -> RepoResult<bool>;

    /// Remove every session owned by a user, returning how many were removed
    async fn remove_for_user(&self, user_id: Uuid) -> RepoResult<u64>;

    /// Find the most recent session owned by a user
    async fn find_by_user_id(&self, user_id: Uuid) -> RepoResult<Option<RefreshSession>>;

    /// Find a session by exact token string
    async fn find_by_token(&self, refresh_token: &str) -> RepoResult<Option<RefreshSession>>;

    /// Check if a token string is already stored
    async fn token_exists(&self, refresh_token: &str) -> RepoResult<bool>;
}

// ============================================================================
// Account Reader (query side)
// ============================================================================

#[async_trait]
pub trait AccountReader: Send + Sync {
    /// Page of accounts in creation order
    async fn read_many(&self, query: &AccountQuery) -> RepoResult<Vec<AccountInfo>>;

    /// First account matching the filter
    async fn read_one(&self, filter: &AccountFilter) -> RepoResult<Option<AccountInfo>>;
}

// ============================================================================
// Unit of Work
// ============================================================================

/// One logical transaction spanning every store.
///
/// Dropping a unit of work without calling [`UnitOfWork::commit`] discards
/// all of its writes.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn refresh_sessions(&self) -> &dyn RefreshSessionRepository;

    fn accounts(&self) -> &dyn AccountReader;

    /// Make every write of this unit durable. A unit can commit once;
    /// later store calls fail with an internal error.
    async fn commit(&self) -> RepoResult<()>;
}

/// Factory for units of work
#[async_trait]
pub trait Database: Send + Sync {
    async fn begin(&self) -> RepoResult<Box<dyn UnitOfWork>>;

    /// Cheap connectivity probe used by readiness checks
    async fn ping(&self) -> RepoResult<()>;
}
