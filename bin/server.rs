// Receipt Points - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use receipt_points::{router, AppState, ReceiptStore, ServerConfig, VERSION};
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("Invalid log filter: {:?}", config.log_level))?;

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_tracing(&config)?;

    // Store lives for the whole process and is dropped on shutdown
    let store = ReceiptStore::new();
    let app = router(AppState::new(store.clone()));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(version = VERSION, %addr, "receipt server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!(receipts = store.len(), "receipt server stopped");
    Ok(())
}
