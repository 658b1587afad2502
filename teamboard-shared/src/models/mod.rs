/// Database models for TeamBoard
///
/// Each model is a plain row struct with associated functions that run its
/// queries. The functions accept any `PgExecutor`, so they work both on the
/// pool and inside a transaction. They return raw `sqlx::Error`s; mapping to
/// domain errors happens in `services`.
///
/// # Models
///
/// - `user`: users and user → team lookups
/// - `team`: teams
/// - `membership`: the team ↔ user join table
/// - `board`: project boards and their OPEN/CLOSED lifecycle
/// - `task`: tasks on a board
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::models::team::{Team, TeamFields};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let team = Team::create(&pool, &TeamFields {
///     name: "platform".to_string(),
///     description: "Platform engineering".to_string(),
///     admin: "1".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod board;
pub mod membership;
pub mod task;
pub mod team;
pub mod user;
