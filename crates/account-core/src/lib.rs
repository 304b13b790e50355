//! # account-core
//!
//! Domain layer containing entities, domain errors and the ports (repository,
//! unit of work, credential, hashing, clock and identity traits).
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    AccountFilter, AccountInfo, AccountQuery, Credential, RefreshSession, Role, RoleSet,
    TokenPayload, UnknownRole, User,
};
pub use error::DomainError;
pub use traits::{
    AccountReader, Clock, CredentialCodec, Database, IdentityProvider, PasswordHasher,
    RefreshSessionRepository, RepoResult, UnitOfWork, UserRepository,
};
