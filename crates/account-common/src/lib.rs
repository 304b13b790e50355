//! # account-common
//!
//! Shared infrastructure: configuration, error handling, the JWT credential
//! codec, password hashing, clocks, and telemetry.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{hash_password, verify_password, Claims, JwtService, PasswordService};
pub use clock::{ManualClock, SystemClock};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, SeedConfig, ServerConfig, StorageBackend, StorageConfig, MAX_TOKEN_TTL_SECS,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
