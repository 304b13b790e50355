//! PostgreSQL repository implementations
//!
//! Every repository of a unit of work shares one open transaction.

mod account;
mod error;
mod refresh_session;
mod transaction;
mod unit_of_work;
mod user;

pub use account::PgAccountReader;
pub use error::{map_db_error, map_unique_violation};
pub use refresh_session::PgRefreshSessionRepository;
pub use unit_of_work::{PgDatabase, PgUnitOfWork};
pub use user::PgUserRepository;
