//! Application configuration structs
//!
//! Loads configuration from environment variables (with `.env` support).

use chrono::TimeDelta;
use serde::Deserialize;
use std::env;

/// Longest accepted token lifetime: ten years
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub seed: SeedConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which store implementation backs the unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

/// Storage selection
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Required for the postgres backend only
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

/// JWT configuration; expiries are in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    /// Access token lifetime
    ///
    /// # Errors
    /// Returns an error if the value is not a positive, representable duration
    pub fn access_ttl(&self) -> Result<TimeDelta, ConfigError> {
        ttl_delta("JWT_ACCESS_TOKEN_EXPIRY", self.access_token_expiry)
    }

    /// Refresh token lifetime
    ///
    /// # Errors
    /// Returns an error if the value is not a positive, representable duration
    pub fn refresh_ttl(&self) -> Result<TimeDelta, ConfigError> {
        ttl_delta("JWT_REFRESH_TOKEN_EXPIRY", self.refresh_token_expiry)
    }
}

fn ttl_delta(key: &'static str, secs: i64) -> Result<TimeDelta, ConfigError> {
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        return Err(ConfigError::InvalidValue(key, secs.to_string()));
    }
    TimeDelta::try_seconds(secs).ok_or_else(|| ConfigError::InvalidValue(key, secs.to_string()))
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Demo account seeding
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub demo_accounts: bool,
}

// Default value functions
fn default_app_name() -> String {
    "account-service".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_migrations_dir() -> String {
    "./migrations".to_string()
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604_800 // 7 days
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required variables are missing or invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let backend = match vars.get("STORAGE_BACKEND").as_deref().map(str::to_lowercase) {
            None => StorageBackend::default(),
            Some(s) if s == "postgres" => StorageBackend::Postgres,
            Some(s) if s == "memory" => StorageBackend::Memory,
            Some(other) => return Err(ConfigError::InvalidValue("STORAGE_BACKEND", other)),
        };

        let database_url = vars.get("DATABASE_URL");
        if backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL"));
        }

        let access_token_expiry = vars.ttl_secs(
            "JWT_ACCESS_TOKEN_EXPIRY",
            "ACCESS_TOKEN_EXPIRATION",
            default_access_token_expiry,
        )?;
        let refresh_token_expiry = vars.ttl_secs(
            "JWT_REFRESH_TOKEN_EXPIRY",
            "REFRESH_TOKEN_EXPIRATION",
            default_refresh_token_expiry,
        )?;

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars.parse("API_PORT")?.unwrap_or_else(default_port),
            },
            storage: StorageConfig { backend },
            database: DatabaseConfig {
                url: database_url,
                max_connections: vars
                    .parse("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: vars
                    .parse("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                migrations_dir: vars
                    .get("MIGRATIONS_DIR")
                    .unwrap_or_else(default_migrations_dir),
            },
            jwt: JwtConfig {
                secret: vars
                    .get("JWT_SECRET")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry,
                refresh_token_expiry,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: vars.parse("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            seed: SeedConfig {
                demo_accounts: vars.parse("SEED_DEMO_ACCOUNTS")?.unwrap_or(false),
            },
        })
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn parse<T: std::str::FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
        }
    }

    /// Token lifetime in seconds, bounded to `1..=MAX_TOKEN_TTL_SECS`
    fn ttl_secs(
        &self,
        key: &'static str,
        alias: &'static str,
        default: fn() -> i64,
    ) -> Result<i64, ConfigError> {
        let secs = self.parse_either(key, alias)?.unwrap_or_else(default);
        ttl_delta(key, secs)?;
        Ok(secs)
    }

    /// First of two alternative names that is set
    fn parse_either<T: std::str::FromStr>(
        &self,
        key: &'static str,
        alias: &'static str,
    ) -> Result<Option<T>, ConfigError> {
        match self.parse(key)? {
            Some(value) => Ok(Some(value)),
            None => self.parse(alias),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
