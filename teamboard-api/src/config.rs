/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `POSTGRES_HOSTNAME`, `POSTGRES_PORT`, `POSTGRES_USERNAME`,
///   `POSTGRES_PASSWORD`, `POSTGRES_DBNAME`: store connection (see
///   `teamboard_shared::config::StoreConfig`)
/// - `POSTGRES_MAX_CONNECTIONS`: pool size (default: 10)
/// - `EXPORT_DIR`: directory for board exports (default: out)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `RUST_LOG`: Log filter (default: debug for TeamBoard crates)
///
/// # Example
///
/// ```no_run
/// use teamboard_api::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use teamboard_shared::config::StoreConfig;
use teamboard_shared::db::pool::DatabaseConfig;
use teamboard_shared::services::ServiceConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Store connection and pool tuning
    pub database: DatabaseConfig,

    /// Export output configuration
    pub export: ExportConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Export output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory that receives `board-<id>.txt` files
    pub dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `POSTGRES_USERNAME` or `POSTGRES_DBNAME` is missing
    /// - A numeric variable has an invalid value
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is not a valid port: {}", e))?;

        let store = StoreConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Invalid store configuration: {}", e))?;

        let max_connections = env::var("POSTGRES_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("POSTGRES_MAX_CONNECTIONS is not a number: {}", e))?;

        if max_connections == 0 {
            anyhow::bail!("POSTGRES_MAX_CONNECTIONS must be at least 1");
        }

        let export_dir = env::var("EXPORT_DIR").unwrap_or_else(|_| "out".to_string());

        let mut database = DatabaseConfig::new(store);
        database.max_connections = max_connections;
        database.min_connections = database.min_connections.min(max_connections);

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database,
            export: ExportConfig {
                dir: PathBuf::from(export_dir),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Settings the service layer is built from
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            database: self.database.clone(),
            export_dir: self.export.dir.clone(),
        }
    }
}
