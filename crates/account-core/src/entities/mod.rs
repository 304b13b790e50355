//! Domain entities - core business objects

mod account;
mod role;
mod session;
mod token;
mod user;

pub use account::{AccountFilter, AccountInfo, AccountQuery};
pub use role::{Role, RoleSet, UnknownRole};
pub use session::RefreshSession;
pub use token::{Credential, TokenPayload};
pub use user::User;
