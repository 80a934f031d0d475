//! # Taskboard Server
//!
//! Runs the task API as a standalone HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! # Run with configuration from ./config
//! cargo run --bin taskboard-server
//!
//! # Run with a specific environment and port
//! TASKBOARD_ENV=production TASKBOARD__SERVER__PORT=8080 cargo run --bin taskboard-server
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use taskboard::config::ConfigManager;
use taskboard::database::open_store;
use taskboard::logging::init_structured_logging;
use taskboard::web::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let manager = ConfigManager::load().context("Failed to load configuration")?;
    let config = manager.config();
    init_structured_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = manager.environment(),
        "Starting Taskboard server"
    );

    let store = open_store(&config.storage)
        .await
        .context("Failed to open task store")?;
    info!(backend = store.backend_name(), "Task store ready");

    let state = Arc::new(AppState::with_system_clock(store, config));
    let app = create_app(state, config.server.request_timeout());

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, "Listening for HTTP requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Taskboard server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
