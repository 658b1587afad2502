//! Common test utilities for API integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Router construction over a live test database
//! - JSON request helpers
//! - Unique names for fixtures

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use teamboard_api::app::{build_router, AppState};
use teamboard_api::config::{ApiConfig, Config, ExportConfig};
use teamboard_shared::config::StoreConfig;
use teamboard_shared::db::pool::DatabaseConfig;
use teamboard_shared::services::Services;
use tower::ServiceExt;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub services: Services,
    pub export_dir: PathBuf,
}

impl TestContext {
    /// Connects to the test database and builds the router
    pub async fn new() -> anyhow::Result<Self> {
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

        let mut database = DatabaseConfig::new(StoreConfig::from_map(vars)?);
        database.max_connections = 5;

        let export_dir =
            std::env::temp_dir().join(format!("teamboard-api-test-{}", Uuid::new_v4().simple()));

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database,
            export: ExportConfig {
                dir: export_dir.clone(),
            },
        };

        let services = Services::connect(&config.service_config()).await?;
        let app = build_router(AppState::new(services.clone(), config));

        Ok(Self {
            app,
            services,
            export_dir,
        })
    }

    /// Sends a request and returns the status and the decoded JSON body
    ///
    /// Empty bodies decode to `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, value)
    }

    /// Creates a user and returns its ID
    pub async fn create_user(&self, display_name: &str) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/v1/users",
                Some(serde_json::json!({
                    "name": unique("user"),
                    "display_name": display_name,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Creates a team and returns its ID
    pub async fn create_team(&self) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/v1/teams",
                Some(serde_json::json!({
                    "name": unique("team"),
                    "description": "API test team",
                    "admin": "1",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create team failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Closes the pool and removes the export directory
    pub async fn cleanup(self) {
        let _ = tokio::fs::remove_dir_all(&self.export_dir).await;
        self.services.shutdown().await;
    }
}

/// A name that will not collide with other test runs
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}
