use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use livereact_api::{create_router, AppState};
use livereact_core::{logging, Config, MemoryCounterStore, ReactionHub};

/// Live audience reactions for presentations
#[derive(Debug, Parser)]
#[command(name = "livereact", version, about)]
struct Cli {
    /// Path to a config file (defaults and LIVEREACT_* env vars apply on top)
    #[arg(short, long, env = "LIVEREACT_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("LiveReact server starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Wire up the broadcast hub and the counter store collaborator
    let hub = Arc::new(ReactionHub::new(config.websocket.send_queue_capacity));
    let store = Arc::new(MemoryCounterStore::new());
    info!(
        send_queue_capacity = config.websocket.send_queue_capacity,
        "ReactionHub initialized"
    );

    let state = AppState::new(hub, store, config.websocket.clone());
    let router = create_router(state);

    // 4. Serve with graceful shutdown
    let listener = tokio::net::TcpListener::bind(config.http_address()).await?;
    info!("HTTP server listening on {}", config.http_address());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shut down gracefully");
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C"); }
        () = terminate => { info!("Received SIGTERM"); }
    }
}
