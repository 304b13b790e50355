//! Transaction shared by every repository of one unit of work

use std::sync::Arc;

use account_core::traits::RepoResult;
use sqlx::{PgConnection, Postgres, Transaction};
use tokio::sync::{Mutex, MutexGuard};

use super::error::{map_db_error, unit_closed};

type Slot = Option<Transaction<'static, Postgres>>;

/// Handle to an open transaction; `None` once committed
#[derive(Clone)]
pub struct TxHandle(Arc<Mutex<Slot>>);

impl TxHandle {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self(Arc::new(Mutex::new(Some(tx))))
    }

    /// Lock the transaction for one statement
    pub async fn lock(&self) -> TxGuard<'_> {
        TxGuard(self.0.lock().await)
    }

    /// Commit and close the transaction
    pub async fn commit(&self) -> RepoResult<()> {
        let tx = self.0.lock().await.take().ok_or_else(unit_closed)?;
        tx.commit().await.map_err(map_db_error)
    }
}

/// Exclusive access to the transaction's connection
pub struct TxGuard<'a>(MutexGuard<'a, Slot>);

impl TxGuard<'_> {
    pub fn conn(&mut self) -> RepoResult<&mut PgConnection> {
        self.0.as_deref_mut().ok_or_else(unit_closed)
    }
}
