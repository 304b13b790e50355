//! # account-db
//!
//! Persistence layer implementing the account-core ports.
//!
//! - [`PgDatabase`]: PostgreSQL via SQLx; every unit of work is one transaction
//! - [`MemoryDatabase`]: in-memory backend with snapshot units of work
//!
//! ## Usage
//!
//! ```rust,ignore
//! use account_core::traits::Database;
//! use account_db::{create_pool, PgDatabase, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/accounts", 10, 1)).await?;
//!     let db = PgDatabase::new(pool);
//!
//!     let uow = db.begin().await?;
//!     let exists = uow.users().username_exists("admin").await?;
//!     uow.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryDatabase, MemoryUnitOfWork};
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgAccountReader, PgDatabase, PgRefreshSessionRepository, PgUnitOfWork, PgUserRepository,
};
