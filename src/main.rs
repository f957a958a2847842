// =============================================================================
// Signal Scout — Main Entry Point
// =============================================================================
//
// `serve` (the default) exposes the analyzer over HTTP; `analyze` runs one
// batch from the command line and prints the report.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod cli;
mod error;
mod indicators;
mod levels;
mod market_data;
mod orchestrator;
mod report;
mod runtime_config;
mod signals;
mod types;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::cli::{Cli, Commands};
use crate::market_data::{BarProvider, YahooClient};
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = RuntimeConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides();

    // ── 2. Market data provider ──────────────────────────────────────────
    let provider: Arc<dyn BarProvider> = Arc::new(YahooClient::new()?);

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Analyze { tickers, profile, json } => {
            cli::run_analyze(&config, provider, tickers, profile, json).await
        }
        Commands::Serve { bind } => {
            if let Some(addr) = bind {
                config.bind_addr = addr;
            }

            // ── 3. Start the API server ──────────────────────────────────
            let bind_addr = config.bind_addr.clone();
            info!(
                profile = %config.scoring_profile,
                tickers = ?config.tickers,
                max_concurrent_fetches = config.max_concurrent_fetches,
                "Signal Scout starting"
            );

            let state = Arc::new(AppState::new(config, provider, Some(cli.config)));
            let app = api::rest::router(state);

            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
            info!(addr = %bind_addr, "API server listening");

            axum::serve(listener, app).await.context("API server failed")
        }
    }
}
