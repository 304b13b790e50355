//! In-memory backend for development and tests
//!
//! Each unit of work reads from a private snapshot taken at `begin` and
//! records its writes. `commit` replays the writes against the shared state
//! under one lock, so unique constraints are checked against everything
//! committed in the meantime. A session removal that no longer finds its row
//! fails the commit with `SessionConsumed`. A failed replay applies nothing.

mod tables;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::instrument;
use uuid::Uuid;

use account_core::entities::{AccountFilter, AccountInfo, AccountQuery, RefreshSession, User};
use account_core::error::DomainError;
use account_core::traits::{
    AccountReader, Database, RefreshSessionRepository, RepoResult, UnitOfWork, UserRepository,
};

use tables::{Op, Tables};

/// Shared in-memory store
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    committed: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn begin(&self) -> RepoResult<Box<dyn UnitOfWork>> {
        let snapshot = self.committed.lock().clone();
        let staging = Arc::new(Staging {
            committed: Arc::clone(&self.committed),
            state: Mutex::new(Some(Staged {
                tables: snapshot,
                ops: Vec::new(),
            })),
        });

        Ok(Box::new(MemoryUnitOfWork {
            users: MemoryUsers(Arc::clone(&staging)),
            refresh_sessions: MemorySessions(Arc::clone(&staging)),
            accounts: MemoryAccounts(Arc::clone(&staging)),
            staging,
        }))
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

struct Staged {
    tables: Tables,
    /// Each write with the rows it affected against the snapshot
    ops: Vec<(Op, u64)>,
}

struct Staging {
    committed: Arc<Mutex<Tables>>,
    /// `None` once committed
    state: Mutex<Option<Staged>>,
}

fn unit_closed() -> DomainError {
    DomainError::InternalError("Unit of work already committed".to_string())
}

impl Staging {
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> RepoResult<T> {
        let state = self.state.lock();
        let staged = state.as_ref().ok_or_else(unit_closed)?;
        Ok(f(&staged.tables))
    }

    fn write(&self, op: Op) -> RepoResult<u64> {
        let mut state = self.state.lock();
        let staged = state.as_mut().ok_or_else(unit_closed)?;
        let affected = staged.tables.apply(&op)?;
        staged.ops.push((op, affected));
        Ok(affected)
    }

    fn commit(&self) -> RepoResult<()> {
        let staged = self.state.lock().take().ok_or_else(unit_closed)?;
        let mut committed = self.committed.lock();

        let mut next = committed.clone();
        for (op, staged_affected) in &staged.ops {
            let affected = next.apply(op)?;
            if let Op::RemoveSession(id) = op {
                if affected < *staged_affected {
                    return Err(DomainError::SessionConsumed(*id));
                }
            }
        }
        *committed = next;
        Ok(())
    }
}

/// Unit of work over a private snapshot of the in-memory store
pub struct MemoryUnitOfWork {
    staging: Arc<Staging>,
    users: MemoryUsers,
    refresh_sessions: MemorySessions,
    accounts: MemoryAccounts,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
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
        self.staging.commit()
    }
}

struct MemoryUsers(Arc<Staging>);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn add(&self, user: &User) -> RepoResult<()> {
        self.0.write(Op::AddUser(user.clone())).map(drop)
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        self.0.write(Op::UpdateUser(user.clone())).map(drop)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.0.read(|t| t.user_by_id(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.0.read(|t| t.user_by_username(username).cloned())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        self.0.read(|t| t.user_by_username(username).is_some())
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        self.0.read(|t| t.user_by_id(id).is_some())
    }
}

struct MemorySessions(Arc<Staging>);

#[async_trait]
impl RefreshSessionRepository for MemorySessions {
    async fn add(&self, session: &RefreshSession) -> RepoResult<()> {
        self.0.write(Op::AddSession(session.clone())).map(drop)
    }

    async fn remove(&self, id: Uuid) -> RepoResult<bool> {
        self.0.write(Op::RemoveSession(id)).map(|removed| removed > 0)
    }

    async fn remove_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        self.0.write(Op::RemoveSessionsForUser(user_id))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> RepoResult<Option<RefreshSession>> {
        self.0.read(|t| t.latest_session_for(user_id).cloned())
    }

    async fn find_by_token(&self, refresh_token: &str) -> RepoResult<Option<RefreshSession>> {
        self.0.read(|t| t.session_by_token(refresh_token).cloned())
    }

    async fn token_exists(&self, refresh_token: &str) -> RepoResult<bool> {
        self.0.read(|t| t.session_by_token(refresh_token).is_some())
    }
}

struct MemoryAccounts(Arc<Staging>);

#[async_trait]
impl AccountReader for MemoryAccounts {
    async fn read_many(&self, query: &AccountQuery) -> RepoResult<Vec<AccountInfo>> {
        self.0.read(|t| t.read_many(query))
    }

    async fn read_one(&self, filter: &AccountFilter) -> RepoResult<Option<AccountInfo>> {
        self.0.read(|t| t.read_one(filter))
    }
}
