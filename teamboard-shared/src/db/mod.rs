/// Database layer for TeamBoard
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: embedded schema migrations
///
/// Row types and their queries live in the `models` module at crate root.

pub mod migrations;
pub mod pool;
