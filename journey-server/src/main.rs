//! journey-server - Journey Map photo sync and read service
//!
//! `serve` (default) runs the HTTP API. `sync` performs one album sync and
//! exits, for schedulers that prefer running a command over calling the
//! trigger endpoint.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use journey_common::store::SqliteKvStore;
use journey_common::{AppConfig, DomainStore};
use journey_server::source::GooglePhotosClient;
use journey_server::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for journey-server
#[derive(Parser, Debug)]
#[command(name = "journey-server")]
#[command(about = "Photo map sync and read service")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to ~/.config/journey-map/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Allow triggering sync with a plain GET and no secret
    #[arg(long)]
    dev: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Sync the configured album once and exit
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if args.dev {
        config.dev_mode = true;
    }

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("journey_server={0},journey_common={0},tower_http={0}", config.logging.level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting journey-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Database path: {}", config.database_path.display());

    let config = Arc::new(config);
    let kv = SqliteKvStore::open(&config.database_path)
        .await
        .context("Failed to open database")?;
    let store = DomainStore::new(Arc::new(kv));
    let source = GooglePhotosClient::new(config.clone()).context("Failed to build HTTP client")?;

    let state = AppState::new(config.clone(), store, Arc::new(source));

    match args.command.unwrap_or(Command::Serve) {
        Command::Sync => {
            let result = state.sync_aggregator().run().await.context("Sync failed")?;
            info!(
                "Synced {} photos into {} locations at {}",
                result.photo_count, result.location_count, result.synced_at
            );
            Ok(())
        }
        Command::Serve => serve(state, config.port).await,
    }
}

async fn serve(state: AppState, port: u16) -> Result<()> {
    if state.config.dev_mode {
        info!("Development mode: GET /api/sync runs without the trigger secret");
    }

    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
