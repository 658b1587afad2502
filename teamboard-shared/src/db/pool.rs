/// Database connection pool management
///
/// This module provides the PostgreSQL connection pool shared by every
/// service. The pool is created once, health-checked before use, and closed
/// explicitly on shutdown.
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::config::StoreConfig;
/// use teamboard_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::new(StoreConfig::from_env()?);
///     let pool = create_pool(&config).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT $1")
///         .bind(42i64)
///         .fetch_one(&pool)
///         .await?;
///
///     close_pool(pool).await;
///     Ok(())
/// }
/// ```

use crate::config::StoreConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection pool
///
/// All timeouts are specified in seconds for ease of configuration from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Where and as whom to connect
    pub store: StoreConfig,

    /// Maximum number of connections in the pool
    ///
    /// Default: 10
    pub max_connections: u32,

    /// Minimum number of idle connections to maintain
    ///
    /// Default: 1
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    ///
    /// Default: 30 seconds
    pub connect_timeout_seconds: u64,

    /// How long a connection can remain idle before being closed (seconds)
    ///
    /// Default: Some(600). None = never closed due to idle time
    pub idle_timeout_seconds: Option<u64>,

    /// Maximum lifetime of a connection before forced recycling (seconds)
    ///
    /// Default: Some(1800)
    pub max_lifetime_seconds: Option<u64>,

    /// Whether to test connections before returning them from the pool
    ///
    /// Default: true
    pub test_before_acquire: bool,
}

impl DatabaseConfig {
    /// Pool configuration with default tuning for the given store
    pub fn new(store: StoreConfig) -> Self {
        Self {
            store,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}

/// Creates and initializes a PostgreSQL connection pool
///
/// This function:
/// 1. Creates a pool with the specified configuration
/// 2. Performs a health check to verify database connectivity
/// 3. Returns an error if the database is unreachable
///
/// # Errors
///
/// Returns an error if the store cannot be reached or the health check fails.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        store = %config.store.redacted_url(),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        connect_timeout_seconds = config.connect_timeout_seconds,
        "Creating database connection pool"
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .test_before_acquire(config.test_before_acquire);

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
        debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
    }

    if let Some(max_lifetime) = config.max_lifetime_seconds {
        pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
        debug!(max_lifetime_seconds = max_lifetime, "Set max lifetime");
    }

    let pool = pool_options
        .connect_with(config.store.connect_options())
        .await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// Executes `SELECT 1` and verifies the answer.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Snapshot of pool usage, reported by the health endpoint
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub active_connections: usize,

    /// Number of idle connections available
    pub idle_connections: usize,

    /// Total connections in the pool
    pub total_connections: usize,
}

pub fn get_pool_stats(pool: &PgPool) -> PoolStats {
    let size = pool.size();
    let idle = pool.num_idle();

    PoolStats {
        active_connections: (size as usize).saturating_sub(idle),
        idle_connections: idle,
        total_connections: size as usize,
    }
}

/// Gracefully closes the connection pool
///
/// Waits for checked-out connections to be returned, then closes them all.
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}
