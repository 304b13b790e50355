//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

mod seed;

pub use seed::seed_demo_accounts;

use std::sync::Arc;

use account_common::{
    AppConfig, AppError, AppResult, JwtService, PasswordService, StorageBackend, SystemClock,
};
use account_core::traits::Database;
use account_db::{create_pool, run_migrations, MemoryDatabase, PgDatabase, PoolConfig};
use account_service::ServiceContextBuilder;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::openapi::swagger_routes;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> AppResult<Router> {
    let api = {
        let config = state.config();
        apply_middleware_with_config(
            create_router(),
            &config.rate_limit,
            &config.cors,
            config.app.env.is_production(),
        )?
    };

    Ok(api
        .merge(health_routes())
        .merge(swagger_routes())
        .with_state(state))
}

/// Open the configured store backend
pub async fn create_database(config: &AppConfig) -> AppResult<Arc<dyn Database>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Ok(Arc::new(MemoryDatabase::new()))
        }
        StorageBackend::Postgres => {
            let url = config.database.url.as_deref().ok_or_else(|| {
                AppError::Config("DATABASE_URL is required for the postgres backend".to_string())
            })?;

            info!("Connecting to PostgreSQL...");
            let pool_config = PoolConfig::new(
                url,
                config.database.max_connections,
                config.database.min_connections,
            );
            let pool = create_pool(&pool_config)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            run_migrations(&pool, &config.database.migrations_dir)
                .await
                .map_err(|e| AppError::Database(format!("migration failed: {e}")))?;
            info!(dir = %config.database.migrations_dir, "Migrations applied");

            Ok(Arc::new(PgDatabase::new(pool)))
        }
    }
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> AppResult<AppState> {
    let database = create_database(&config).await?;

    let clock = Arc::new(SystemClock);
    let codec = Arc::new(JwtService::new(&config.jwt.secret, clock.clone()));

    let service_context = ServiceContextBuilder::new()
        .database(database)
        .codec(codec)
        .hasher(Arc::new(PasswordService::new()))
        .clock(clock)
        .access_ttl(config.jwt.access_ttl().map_err(|e| AppError::Config(e.to_string()))?)
        .refresh_ttl(config.jwt.refresh_ttl().map_err(|e| AppError::Config(e.to_string()))?)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    if config.seed.demo_accounts {
        seed_demo_accounts(&service_context).await?;
    }

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> AppResult<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    serve(listener, app).await
}
