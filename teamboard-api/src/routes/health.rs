/// Health check endpoint
///
/// Provides a simple health check endpoint that verifies:
/// - The server is running
/// - Database connectivity
/// - Whether every embedded migration has been applied
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations": {
///     "applied_migrations": 3,
///     "known_migrations": 3,
///     "latest_version": 20250101000003,
///     "is_up_to_date": true
///   },
///   "pool": { "active_connections": 1, "idle_connections": 1, "total_connections": 2 },
///   "export_dir": "out"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use teamboard_shared::db::{
    migrations::{get_migration_status, MigrationStatus},
    pool::{get_pool_stats, health_check as db_health_check, PoolStats},
};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,

    /// Migration state; absent while the database is unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations: Option<MigrationStatus>,

    /// Connection pool usage
    pub pool: PoolStats,

    /// Where board exports are written
    pub export_dir: String,
}

/// Health check handler
///
/// Reports "degraded" if the database is unreachable or migrations are
/// pending.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let pool = state.services.pool();

    let connected = db_health_check(pool).await.is_ok();
    let migrations = if connected {
        match get_migration_status(pool).await {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read migration status");
                None
            }
        }
    } else {
        None
    };

    let up_to_date = migrations.as_ref().map_or(false, |m| m.is_up_to_date);

    Ok(Json(HealthResponse {
        status: if connected && up_to_date {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        migrations,
        pool: get_pool_stats(pool),
        export_dir: state.config.export.dir.display().to_string(),
    }))
}
