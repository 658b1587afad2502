/// Business operations for users, teams and boards
///
/// Each service owns one entity group. Operations take a typed request,
/// validate it before touching the store, run one statement or one
/// transaction, and return a typed response or a `ServiceError`.
///
/// - `user`: `UserService`
/// - `team`: `TeamService` (teams and membership)
/// - `board`: `BoardService` (boards, tasks, export)
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::config::StoreConfig;
/// use teamboard_shared::db::pool::DatabaseConfig;
/// use teamboard_shared::services::{ServiceConfig, Services};
/// use teamboard_shared::services::user::CreateUserRequest;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = ServiceConfig {
///     database: DatabaseConfig::new(StoreConfig::from_env()?),
///     export_dir: "out".into(),
/// };
/// let services = Services::connect(&config).await?;
///
/// let created = services.users.create_user(CreateUserRequest {
///     name: "ada".to_string(),
///     display_name: "Ada Lovelace".to_string(),
/// }).await?;
/// println!("created user {}", created.id);
///
/// services.shutdown().await;
/// # Ok(())
/// # }
/// ```

pub mod board;
pub mod team;
pub mod user;

use crate::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use crate::error::{is_unique_violation, ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::path::PathBuf;
use tracing::warn;
use validator::Validate;

pub use board::BoardService;
pub use team::TeamService;
pub use user::UserService;

/// Everything the services need at construction
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Store connection and pool tuning
    pub database: DatabaseConfig,

    /// Directory that receives board exports
    pub export_dir: PathBuf,
}

/// Response carrying the ID of the created or modified record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i32,
}

/// The three services sharing one connection pool
#[derive(Clone)]
pub struct Services {
    pool: PgPool,
    pub users: UserService,
    pub teams: TeamService,
    pub boards: BoardService,
}

impl Services {
    /// Opens the pool, applies pending migrations and builds the services
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or a migration fails.
    pub async fn connect(config: &ServiceConfig) -> anyhow::Result<Self> {
        let pool = create_pool(&config.database).await?;

        if let Err(e) = run_migrations(&pool).await {
            close_pool(pool).await;
            return Err(e.into());
        }

        Ok(Self::from_pool(pool, config.export_dir.clone()))
    }

    /// Builds the services over an existing pool
    pub fn from_pool(pool: PgPool, export_dir: PathBuf) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            teams: TeamService::new(pool.clone()),
            boards: BoardService::new(pool.clone(), export_dir),
            pool,
        }
    }

    /// The shared pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Closes the pool; every service clone stops working afterwards
    pub async fn shutdown(self) {
        close_pool(self.pool).await;
    }
}

/// Validates a request, logging the rejection
pub(crate) fn validate_request<T: Validate>(operation: &'static str, request: &T) -> ServiceResult<()> {
    request.validate().map_err(|errors| {
        let err = ServiceError::from(errors);
        warn!(operation, error = %err, "Rejected invalid request");
        err
    })
}

/// Maps a unique violation to `DuplicateEntity`, anything else to `Store`
pub(crate) fn duplicate_or_store(
    err: sqlx::Error,
    entity: &'static str,
    detail: impl FnOnce() -> String,
) -> ServiceError {
    if is_unique_violation(&err) {
        let err = ServiceError::duplicate(entity, detail());
        warn!(error = %err, "Uniqueness constraint rejected write");
        err
    } else {
        ServiceError::Store(err)
    }
}
