use std::time::Duration;

use db::{DBService, DbErr};
use server::{
    AppState,
    config::{ConfigError, ServerConfig},
    http, seed,
};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, prelude::*};

const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TaskboardError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn init_tracing() -> Result<(), anyhow::Error> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},db={level},board_client={level},tower_http={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string)
        .map_err(|err| anyhow::anyhow!("Failed to create tracing filter: {err}"))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), TaskboardError> {
    init_tracing()?;

    let config = ServerConfig::from_env()?;

    // Create asset directory if it doesn't exist
    if !config.asset_dir.exists() {
        std::fs::create_dir_all(&config.asset_dir)?;
    }

    let db = DBService::new(&config.database_url).await?;
    if config.seed {
        let seeded = seed::seed_if_empty(&db).await?;
        tracing::info!("Seeded {seeded} boards");
    }

    let app_router = http::router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let actual_port = listener.local_addr()?.port();
    tracing::info!("Server running on http://{}:{actual_port}", config.host);

    axum::serve(listener, app_router)
        .with_graceful_shutdown(graceful_shutdown(GRACEFUL_SHUTDOWN_TIMEOUT))
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}

/// Drives axum's graceful shutdown. Once draining starts, a second signal or
/// the deadline ends the process with exit code 130.
async fn graceful_shutdown(deadline: Duration) {
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, draining connections (signal again to force)");
    tokio::spawn(async move {
        match force_exit_trigger(shutdown_signal(), deadline).await {
            ForceExit::Signal => tracing::warn!("Second shutdown signal received, exiting now"),
            ForceExit::Deadline => {
                tracing::warn!("Connections still open after {deadline:?}, exiting now")
            }
        }
        std::process::exit(130);
    });
}

#[derive(Debug, PartialEq, Eq)]
enum ForceExit {
    Signal,
    Deadline,
}

async fn force_exit_trigger(signal: impl Future<Output = ()>, deadline: Duration) -> ForceExit {
    tokio::select! {
        _ = signal => ForceExit::Signal,
        _ = tokio::time::sleep(deadline) => ForceExit::Deadline,
    }
}
