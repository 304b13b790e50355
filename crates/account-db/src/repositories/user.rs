//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use account_core::entities::User;
use account_core::error::DomainError;
use account_core::traits::{RepoResult, UserRepository};

use crate::mappers::roles_to_db;
use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};
use super::transaction::TxHandle;

const USER_COLUMNS: &str = "id, first_name, last_name, username, password_hash, roles, \
                            is_active, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    tx: TxHandle,
}

impl PgUserRepository {
    pub(crate) fn new(tx: TxHandle) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id, username = %user.username))]
    async fn add(&self, user: &User) -> RepoResult<()> {
        let mut guard = self.tx.lock().await;
        sqlx::query(
            r"
            INSERT INTO users (id, first_name, last_name, username, password_hash, roles,
                               is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(roles_to_db(&user.roles))
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(guard.conn()?)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::UsernameExists(user.username.clone()))
        })?;

        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut guard = self.tx.lock().await;
        let result = sqlx::query(
            r"
            UPDATE users
            SET first_name = $2, last_name = $3, username = $4, password_hash = $5,
                roles = $6, is_active = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(roles_to_db(&user.roles))
        .bind(user.is_active)
        .bind(user.updated_at)
        .execute(guard.conn()?)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::UsernameExists(user.username.clone()))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(user.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let mut guard = self.tx.lock().await;
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(id)
            .fetch_optional(guard.conn()?)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let mut guard = self.tx.lock().await;
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(username)
            .fetch_optional(guard.conn()?)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let mut guard = self.tx.lock().await;
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(guard.conn()?)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        let mut guard = self.tx.lock().await;
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(guard.conn()?)
            .await
            .map_err(map_db_error)
    }
}
