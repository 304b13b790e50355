//! User entity <-> model mapper

use account_core::entities::{AccountInfo, Role, RoleSet, User};
use account_core::error::DomainError;

use crate::models::{AccountModel, UserModel};

/// Parse a stored role array; an unknown name means the row is corrupt
pub fn roles_from_db(raw: &[String]) -> Result<RoleSet, DomainError> {
    raw.iter()
        .map(|name| {
            name.parse::<Role>()
                .map_err(|e| DomainError::DatabaseError(format!("Corrupt roles column: {e}")))
        })
        .collect()
}

/// Serialize a role set for a TEXT[] column
pub fn roles_to_db(roles: &RoleSet) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_string()).collect()
}

/// Convert UserModel to User entity
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
            password_hash: model.password_hash,
            roles: roles_from_db(&model.roles)?,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Convert AccountModel to the read projection
impl TryFrom<AccountModel> for AccountInfo {
    type Error = DomainError;

    fn try_from(model: AccountModel) -> Result<Self, Self::Error> {
        Ok(AccountInfo {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
            roles: roles_from_db(&model.roles)?,
            is_active: model.is_active,
        })
    }
}
