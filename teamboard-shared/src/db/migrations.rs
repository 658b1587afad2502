/// Schema migrations
///
/// The schema (`users`, `teams`, `team_members`, `project_boards`, `tasks`)
/// lives in `migrations/` next to this crate's `Cargo.toml` and is embedded
/// into the binary at compile time.
///
/// Each migration is a reversible pair:
/// - `{timestamp}_{name}.up.sql`
/// - `{timestamp}_{name}.down.sql`
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::db::migrations::{get_migration_status, run_migrations};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// run_migrations(&pool).await?;
/// let status = get_migration_status(&pool).await?;
/// println!("Applied {} migrations", status.applied_migrations);
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use sqlx::{migrate::Migrator, postgres::PgPool};
use tracing::{debug, info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Migration status information
#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Number of migrations embedded in this build
    pub known_migrations: usize,

    /// Latest applied migration version (timestamp)
    pub latest_version: Option<i64>,

    /// Whether every embedded migration has been applied
    pub is_up_to_date: bool,
}

/// Runs all pending database migrations
///
/// Already-applied migrations are skipped, so this is safe to call on every
/// startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Gets the current migration status
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    let known_migrations = MIGRATOR.iter().filter(|m| m.migration_type.is_up_migration()).count();

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            known_migrations,
            latest_version: None,
            is_up_to_date: known_migrations == 0,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT
            COUNT(*) as count,
            MAX(version) as latest_version
         FROM _sqlx_migrations
         WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    let applied_migrations = count as usize;

    debug!(
        applied_migrations,
        known_migrations,
        latest_version = ?latest_version,
        "Migration status retrieved"
    );

    Ok(MigrationStatus {
        applied_migrations,
        known_migrations,
        latest_version,
        is_up_to_date: applied_migrations >= known_migrations,
    })
}
