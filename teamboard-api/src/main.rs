//! # TeamBoard API Server
//!
//! JSON over HTTP front end for the TeamBoard services: users, teams with
//! membership, and project boards with tasks.
//!
//! ## Usage
//!
//! ```bash
//! POSTGRES_USERNAME=teamboard POSTGRES_DBNAME=teamboard cargo run -p teamboard-api
//! ```

use teamboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use teamboard_shared::services::Services;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "teamboard_api=debug,teamboard_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TeamBoard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    tracing::info!(
        database = %config.database.store.redacted_url(),
        max_connections = config.database.max_connections,
        export_dir = %config.export.dir.display(),
        "Configuration loaded"
    );

    let services = Services::connect(&config.service_config()).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(services.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    services.shutdown().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting shutdown"),
    }
}
