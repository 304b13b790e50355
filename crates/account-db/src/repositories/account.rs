//! PostgreSQL implementation of AccountReader

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::instrument;

use account_core::entities::{AccountFilter, AccountInfo, AccountQuery};
use account_core::traits::{AccountReader, RepoResult};

use crate::models::AccountModel;

use super::error::map_db_error;
use super::transaction::TxHandle;

/// PostgreSQL implementation of AccountReader
#[derive(Clone)]
pub struct PgAccountReader {
    tx: TxHandle,
}

impl PgAccountReader {
    pub(crate) fn new(tx: TxHandle) -> Self {
        Self { tx }
    }
}

/// Escape LIKE wildcards so the filter matches literally
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn select_accounts(filter: &AccountFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT id, first_name, last_name, username, roles, is_active FROM users WHERE TRUE",
    );

    if let Some(user_id) = filter.user_id {
        qb.push(" AND id = ").push_bind(user_id);
    }
    if let Some(role) = filter.role {
        qb.push(" AND ")
            .push_bind(role.as_str())
            .push(" = ANY(roles)");
    }
    if filter.only_active {
        qb.push(" AND is_active");
    }
    if let Some(name) = &filter.name_filter {
        qb.push(" AND (first_name || ' ' || last_name) ILIKE ")
            .push_bind(like_pattern(name))
            .push(r" ESCAPE '\'");
    }

    qb
}

#[async_trait]
impl AccountReader for PgAccountReader {
    #[instrument(skip(self))]
    async fn read_many(&self, query: &AccountQuery) -> RepoResult<Vec<AccountInfo>> {
        let mut qb = select_accounts(&query.filter);
        qb.push(" ORDER BY created_at, id OFFSET ")
            .push_bind(query.offset)
            .push(" LIMIT ")
            .push_bind(query.limit);

        let mut guard = self.tx.lock().await;
        let rows = qb
            .build_query_as::<AccountModel>()
            .fetch_all(guard.conn()?)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(AccountInfo::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn read_one(&self, filter: &AccountFilter) -> RepoResult<Option<AccountInfo>> {
        let mut qb = select_accounts(filter);
        qb.push(" ORDER BY created_at, id LIMIT 1");

        let mut guard = self.tx.lock().await;
        let row = qb
            .build_query_as::<AccountModel>()
            .fetch_optional(guard.conn()?)
            .await
            .map_err(map_db_error)?;

        row.map(AccountInfo::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_core::entities::Role;
    use uuid::Uuid;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("house"), "%house%");
        assert_eq!(like_pattern("100%_"), r"%100\%\_%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn test_select_accounts_sql() {
        let filter = AccountFilter::by_id(Uuid::nil())
            .with_role(Role::Doctor)
            .with_name_filter(Some("greg".to_string()));
        let qb = select_accounts(&filter);
        let sql = qb.sql();

        assert!(sql.contains("AND id = $1"));
        assert!(sql.contains("AND $2 = ANY(roles)"));
        assert!(sql.contains("AND is_active"));
        assert!(sql.contains("ILIKE $3"));
    }

    #[test]
    fn test_inactive_accounts_not_filtered_when_requested() {
        let filter = AccountFilter::default().including_inactive();
        let qb = select_accounts(&filter);
        assert!(!qb.sql().contains("AND is_active"));
    }
}
