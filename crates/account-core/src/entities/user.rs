//! User entity - an account identity record

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::role::{Role, RoleSet};

/// User entity representing a platform account
///
/// Accounts are never hard-deleted; deletion clears `is_active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub roles: RoleSet,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with a freshly generated id
    pub fn new(
        first_name: String,
        last_name: String,
        username: String,
        password_hash: String,
        roles: RoleSet,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            username,
            password_hash,
            roles,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a self-registered user holding only the base role
    pub fn standard(
        first_name: String,
        last_name: String,
        username: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            first_name,
            last_name,
            username,
            password_hash,
            RoleSet::from([Role::User]),
            now,
        )
    }

    /// Check whether the user holds a role
    #[inline]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Full display name: "first last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Update the profile fields a user may change on their own account
    pub fn rename(
        &mut self,
        first_name: String,
        last_name: String,
        username: String,
        now: DateTime<Utc>,
    ) {
        self.first_name = first_name;
        self.last_name = last_name;
        self.username = username;
        self.updated_at = now;
    }

    /// Replace the role set
    pub fn set_roles(&mut self, roles: RoleSet, now: DateTime<Utc>) {
        self.roles = roles;
        self.updated_at = now;
    }

    /// Replace the stored password hash
    pub fn set_password_hash(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.updated_at = now;
    }

    /// Soft delete: the account stays stored but becomes inactive
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}
