//! Halal Guide Server - Headless Daemon
//!
//! A Rust HTTP server that:
//! - Classifies products by barcode, label photo, or ingredient text on /api/*
//! - Rotates inference credentials with failover and meters daily usage per user
//! - Optionally serves the web UI as static files
//!
//! Access via: http://localhost:3000

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod api;
mod cli;
mod router;
mod state;

#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands};
use halal_core::modules::{config::load_config, logger::init_tracing};
use halal_types::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref()).map_err(anyhow::Error::msg)?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::CheckConfig => {
            print_config_summary(&config);
            Ok(())
        },
        Commands::Serve => serve(config).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;

    let state = AppState::from_config(config)?;
    info!("✅ Application state initialized ({} credential(s))", state.credential_count());

    let app = router::build_router(state);

    info!("🌐 Server listening on http://{}", addr);
    info!("🔌 API available at http://{}/api/", addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn print_config_summary(config: &AppConfig) {
    println!("Configuration OK");
    println!("  listen:       {}:{}", config.server.host, config.server.port);
    println!("  model:        {}", config.inference.model);
    println!("  api keys:     {}", config.api_keys.len());
    println!("  max attempts: {}", config.inference.max_attempts);
    println!("  daily limit:  {}", config.quota.daily_limit);
    println!("  quota store:  {:?}", config.quota.store);
    println!("  catalog:      {}", config.catalog.base_url);
}
