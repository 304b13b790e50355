//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, SeedConfig, ServerConfig, StorageBackend, StorageConfig, MAX_TOKEN_TTL_SECS,
};
