//! PostgreSQL unit of work: one transaction shared by every store

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use account_core::traits::{
    AccountReader, Database, RefreshSessionRepository, RepoResult, UnitOfWork, UserRepository,
};

use super::account::PgAccountReader;
use super::error::map_db_error;
use super::refresh_session::PgRefreshSessionRepository;
use super::transaction::TxHandle;
use super::user::PgUserRepository;

/// Unit-of-work factory over a PostgreSQL pool
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Database for PgDatabase {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgUnitOfWork::new(TxHandle::new(tx))))
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

/// Repositories bound to one open transaction.
///
/// Dropping without commit rolls the transaction back.
pub struct PgUnitOfWork {
    tx: TxHandle,
    users: PgUserRepository,
    refresh_sessions: PgRefreshSessionRepository,
    accounts: PgAccountReader,
}

impl PgUnitOfWork {
    fn new(tx: TxHandle) -> Self {
        Self {
            users: PgUserRepository::new(tx.clone()),
            refresh_sessions: PgRefreshSessionRepository::new(tx.clone()),
            accounts: PgAccountReader::new(tx.clone()),
            tx,
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn refresh_sessions(&self) -> &dyn RefreshSessionRepository {
        &self.refresh_sessions
    }

    fn accounts(&self) -> &dyn AccountReader {
        &self.accounts
    }

    #[instrument(skip(self))]
    async fn commit(&self) -> RepoResult<()> {
        self.tx.commit().await
    }
}
