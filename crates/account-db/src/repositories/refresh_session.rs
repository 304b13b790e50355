//! PostgreSQL implementation of RefreshSessionRepository

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use account_core::entities::RefreshSession;
use account_core::error::DomainError;
use account_core::traits::{RefreshSessionRepository, RepoResult};

use crate::models::RefreshSessionModel;

use super::error::{map_db_error, map_unique_violation};
use super::transaction::TxHandle;

/// PostgreSQL implementation of RefreshSessionRepository
#[derive(Clone)]
pub struct PgRefreshSessionRepository {
    tx: TxHandle,
}

impl PgRefreshSessionRepository {
    pub(crate) fn new(tx: TxHandle) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl RefreshSessionRepository for PgRefreshSessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
    async fn add(&self, session: &RefreshSession) -> RepoResult<()> {
        let mut guard = self.tx.lock().await;
        sqlx::query(
            r"
            INSERT INTO refresh_sessions (id, user_id, refresh_token, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.refresh_token)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(guard.conn()?)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::InternalError("Refresh token already stored".to_string())
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: Uuid) -> RepoResult<bool> {
        let mut guard = self.tx.lock().await;
        let result = sqlx::query("DELETE FROM refresh_sessions WHERE id = $1")
            .bind(id)
            .execute(guard.conn()?)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn remove_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let mut guard = self.tx.lock().await;
        let result = sqlx::query("DELETE FROM refresh_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(guard.conn()?)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: Uuid) -> RepoResult<Option<RefreshSession>> {
        let mut guard = self.tx.lock().await;
        let result = sqlx::query_as::<_, RefreshSessionModel>(
            r"
            SELECT id, user_id, refresh_token, expires_at, created_at
            FROM refresh_sessions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(guard.conn()?)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshSession::from))
    }

    #[instrument(skip_all)]
    async fn find_by_token(&self, refresh_token: &str) -> RepoResult<Option<RefreshSession>> {
        let mut guard = self.tx.lock().await;
        let result = sqlx::query_as::<_, RefreshSessionModel>(
            r"
            SELECT id, user_id, refresh_token, expires_at, created_at
            FROM refresh_sessions
            WHERE refresh_token = $1
            ",
        )
        .bind(refresh_token)
        .fetch_optional(guard.conn()?)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshSession::from))
    }

    #[instrument(skip_all)]
    async fn token_exists(&self, refresh_token: &str) -> RepoResult<bool> {
        let mut guard = self.tx.lock().await;
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM refresh_sessions WHERE refresh_token = $1)",
        )
        .bind(refresh_token)
        .fetch_one(guard.conn()?)
        .await
        .map_err(map_db_error)
    }
}
