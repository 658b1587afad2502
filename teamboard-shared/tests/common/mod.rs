//! Common test utilities for store-backed tests
//!
//! Connection settings come from the usual `POSTGRES_*` variables, with
//! local defaults so `cargo test -- --ignored` works against a developer
//! database:
//!
//! ```bash
//! export POSTGRES_USERNAME=teamboard POSTGRES_PASSWORD=teamboard POSTGRES_DBNAME=teamboard_test
//! ```

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use teamboard_shared::config::StoreConfig;
use teamboard_shared::db::pool::DatabaseConfig;
use teamboard_shared::services::{ServiceConfig, Services};
use uuid::Uuid;

/// Store settings from the environment, falling back to local defaults
pub fn test_store() -> StoreConfig {
    let mut vars: HashMap<String, String> = std::env::vars()
        .filter(|(key, _)| key.starts_with("POSTGRES_"))
        .collect();

    for (key, default) in [
        ("POSTGRES_USERNAME", "teamboard"),
        ("POSTGRES_PASSWORD", "teamboard"),
        ("POSTGRES_DBNAME", "teamboard_test"),
    ] {
        vars.entry(key.to_string()).or_insert_with(|| default.to_string());
    }

    StoreConfig::from_map(vars).expect("invalid POSTGRES_* settings")
}

/// Pool settings sized for tests
pub fn test_database_config() -> DatabaseConfig {
    let mut config = DatabaseConfig::new(test_store());
    config.max_connections = 5;
    config.connect_timeout_seconds = 10;
    config
}

/// A fresh export directory under the system temp dir
pub fn temp_export_dir() -> PathBuf {
    std::env::temp_dir().join(format!("teamboard-test-{}", Uuid::new_v4().simple()))
}

/// Connected services with migrations applied
pub async fn services() -> Services {
    let config = ServiceConfig {
        database: test_database_config(),
        export_dir: temp_export_dir(),
    };
    Services::connect(&config)
        .await
        .expect("failed to connect test services")
}

/// A name that will not collide with other test runs
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}
