use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use audiobook_api::api::handlers::AppStateInner;
use audiobook_api::api::routes::create_router;
use audiobook_api::config::Config;
use audiobook_api::{db, errors, metrics, telemetry};

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Starting graceful shutdown...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: it decides how logging is set up
    let config = Config::from_env().context("Failed to load configuration")?;

    telemetry::init(&config.app, &config.log_filter()).context("Failed to initialize logging")?;
    errors::panic::install_hook();

    info!(
        "Starting {} v{} ({})",
        config.app.project_name,
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    metrics::registry::init_metrics();
    info!("Metrics registry initialized");

    info!("Connecting to database...");
    let db = db::init_database(&config.database)
        .await
        .context("Failed to initialize database")?;

    db.test_connection()
        .await
        .context("Failed to test database connection")?;
    info!("Database connection established");

    let addr = config.server_address();
    let state = Arc::new(AppStateInner::new(config, db));
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind server")?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");

    Ok(())
}
