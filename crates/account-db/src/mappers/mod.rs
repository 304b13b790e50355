//! Entity to model mappers
//!
//! - `From`/`TryFrom<Model> for Entity`: convert database rows to domain objects
//! - role helpers for the `TEXT[]` roles column

mod refresh_session;
mod user;

pub use user::{roles_from_db, roles_to_db};
