//! Ports implemented by the infrastructure crates

mod ports;
mod repositories;

pub use ports::{Clock, CredentialCodec, IdentityProvider, PasswordHasher};
pub use repositories::{
    AccountReader, Database, RefreshSessionRepository, RepoResult, UnitOfWork, UserRepository,
};
