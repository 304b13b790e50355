//! Account read model - denormalized projection served by the account reader

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::{Role, RoleSet};
use super::user::User;

/// Public summary of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccountInfo {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[schema(value_type = Vec<Role>)]
    pub roles: RoleSet,
    pub is_active: bool,
}

impl From<&User> for AccountInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            roles: user.roles.clone(),
            is_active: user.is_active,
        }
    }
}

/// Selection criteria for account reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFilter {
    pub user_id: Option<Uuid>,
    pub role: Option<Role>,
    pub only_active: bool,
    /// Case-insensitive substring over "first last"
    pub name_filter: Option<String>,
}

impl Default for AccountFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            role: None,
            only_active: true,
            name_filter: None,
        }
    }
}

impl AccountFilter {
    /// Filter matching a single account by id
    pub fn by_id(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn including_inactive(mut self) -> Self {
        self.only_active = false;
        self
    }

    /// Blank filters are treated as absent
    #[must_use]
    pub fn with_name_filter(mut self, name_filter: Option<String>) -> Self {
        self.name_filter = name_filter.filter(|s| !s.trim().is_empty());
        self
    }

    /// Evaluate the filter against an in-memory user
    pub fn matches(&self, user: &User) -> bool {
        if self.user_id.is_some_and(|id| id != user.id) {
            return false;
        }
        if self.role.is_some_and(|role| !user.has_role(role)) {
            return false;
        }
        if self.only_active && !user.is_active {
            return false;
        }
        if let Some(needle) = &self.name_filter {
            let haystack = user.full_name().to_lowercase();
            if !haystack.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Paged account read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub filter: AccountFilter,
    pub offset: i64,
    pub limit: i64,
}

impl AccountQuery {
    pub fn new(filter: AccountFilter, offset: i64, limit: i64) -> Self {
        Self {
            filter,
            offset,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doctor(first: &str, last: &str, active: bool) -> User {
        let mut user = User::new(
            first.to_string(),
            last.to_string(),
            format!("{first}.{last}"),
            "hash".to_string(),
            RoleSet::from([Role::Doctor]),
            Utc::now(),
        );
        user.is_active = active;
        user
    }

    #[test]
    fn test_default_filter_excludes_inactive() {
        let filter = AccountFilter::default();
        assert!(filter.matches(&doctor("Gregory", "House", true)));
        assert!(!filter.matches(&doctor("Gregory", "House", false)));
        assert!(filter.including_inactive().matches(&doctor("Gregory", "House", false)));
    }

    #[test]
    fn test_role_filter() {
        let filter = AccountFilter::default().with_role(Role::Admin);
        assert!(!filter.matches(&doctor("Gregory", "House", true)));
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let user = doctor("Gregory", "House", true);
        let filter = AccountFilter::default().with_name_filter(Some("ory ho".to_string()));
        assert!(filter.matches(&user));

        let filter = AccountFilter::default().with_name_filter(Some("wilson".to_string()));
        assert!(!filter.matches(&user));
    }

    #[test]
    fn test_blank_name_filter_is_ignored() {
        let filter = AccountFilter::default().with_name_filter(Some("   ".to_string()));
        assert!(filter.name_filter.is_none());
    }

    #[test]
    fn test_account_info_from_user() {
        let user = doctor("James", "Wilson", true);
        let info = AccountInfo::from(&user);
        assert_eq!(info.id, user.id);
        assert_eq!(info.username, "James.Wilson");
        assert!(info.roles.contains(&Role::Doctor));
    }
}
