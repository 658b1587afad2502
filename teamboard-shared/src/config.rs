/// Store connection settings
///
/// The relational store is reached through five settings read from the
/// process environment under the `POSTGRES_` prefix:
///
/// - `POSTGRES_HOSTNAME`: server host (default: localhost)
/// - `POSTGRES_PORT`: server port (default: 5432)
/// - `POSTGRES_USERNAME`: login role (required)
/// - `POSTGRES_PASSWORD`: password (default: empty)
/// - `POSTGRES_DBNAME`: database name (required)
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::config::StoreConfig;
///
/// # fn example() -> Result<(), config::ConfigError> {
/// let store = StoreConfig::from_env()?;
/// println!("Connecting to {}", store.redacted_url());
/// # Ok(())
/// # }
/// ```

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::collections::HashMap;
use std::fmt;

/// Environment prefix for store settings
pub const ENV_PREFIX: &str = "POSTGRES";

/// Connection settings for the PostgreSQL store
#[derive(Clone, Deserialize)]
pub struct StoreConfig {
    /// Server host name or address
    pub hostname: String,

    /// Server port
    pub port: u16,

    /// Login role
    pub username: String,

    /// Password for `username`
    pub password: String,

    /// Database to connect to
    pub dbname: String,
}

impl StoreConfig {
    /// Loads store settings from the process environment
    ///
    /// A `.env` file in the working directory is honoured in development.
    ///
    /// # Errors
    ///
    /// Returns an error if `POSTGRES_USERNAME` or `POSTGRES_DBNAME` is
    /// missing, or if `POSTGRES_PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(None)
    }

    /// Loads store settings from an explicit variable map instead of the
    /// process environment. Keys use the same `POSTGRES_*` names.
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(Some(vars))
    }

    fn load(source: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("hostname", "localhost")?
            .set_default("port", 5432)?
            .set_default("password", "")?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(source),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Builds sqlx connect options from these settings
    ///
    /// Options are passed field by field, so passwords containing URL
    /// metacharacters need no escaping.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.hostname)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.dbname)
    }

    /// Connection string with the password left out, for logs
    pub fn redacted_url(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.username, self.hostname, self.port, self.dbname
        )
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}
