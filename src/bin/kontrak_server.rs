//! # Kontrak Server
//!
//! Runs the contract API: loads configuration, prepares the database and
//! serves HTTP until SIGINT or SIGTERM.
//!
//! ```bash
//! KONTRAK_ENV=production DATABASE_URL=postgresql://... JWT_SECRET=... kontrak-server
//! ```

use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use kontrak_core::config::ConfigManager;
use kontrak_core::database::{seed_initial_data, DatabaseConnection, DatabaseMigrations};
use kontrak_core::logging;
use kontrak_core::web::{create_app, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = ConfigManager::detect_environment();
    logging::init_structured_logging(&environment);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %environment,
        "Starting Kontrak server"
    );

    let manager = ConfigManager::load().context("failed to load configuration")?;
    let config = manager.config().clone();

    let database = DatabaseConnection::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let pool = database.into_pool();

    if config.database.run_migrations {
        DatabaseMigrations::run_all(&pool)
            .await
            .context("failed to run migrations")?;
    }

    if config.seed.enabled {
        seed_initial_data(&pool, &config.seed, &config.auth)
            .await
            .context("failed to seed initial data")?;
    }

    let state = AppState::new(config.clone(), manager.environment(), pool.clone())
        .context("failed to build application state")?;

    let sweeper = state
        .rate_limiter
        .is_enabled()
        .then(|| state.rate_limiter.spawn_sweeper(config.rate_limiting.sweep_interval()));

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;
    info!(address = %config.server.bind_address, "Listening");

    axum::serve(
        listener,
        create_app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    pool.close().await;

    info!("Kontrak server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
