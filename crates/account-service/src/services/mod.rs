//! Business logic services
//!
//! Every inbound request opens a [`RequestScope`] from the shared
//! [`ServiceContext`]; services borrow the scope for the duration of one
//! operation.

pub mod account;
pub mod auth;
pub mod context;
pub mod error;
pub mod identity;
pub mod scope;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::AccountService;
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use identity::BearerIdentity;
pub use scope::RequestScope;
