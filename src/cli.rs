use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::market_data::BarProvider;
use crate::orchestrator::{normalize_tickers, BatchOrchestrator};
use crate::report::{BatchResponse, Summary, TextReport};
use crate::runtime_config::{RuntimeConfig, DEFAULT_CONFIG_PATH};
use crate::types::ScoringProfile;

#[derive(Parser)]
#[command(name = "signal-scout")]
#[command(about = "Daily buy-signal analyzer for stocks and ETFs", long_about = None)]
pub struct Cli {
    /// Runtime config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Listen address, overrides the config file
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Analyze tickers once and print a report
    Analyze {
        /// Tickers to analyze; defaults to the configured list
        tickers: Vec<String>,

        /// Scoring profile (detailed | lightweight)
        #[arg(short, long)]
        profile: Option<ScoringProfile>,

        /// Print the JSON batch response instead of text
        #[arg(long)]
        json: bool,
    },
}

/// One-shot analysis for the `analyze` subcommand.
pub async fn run_analyze(
    config: &RuntimeConfig,
    provider: Arc<dyn BarProvider>,
    tickers: Vec<String>,
    profile: Option<ScoringProfile>,
    json: bool,
) -> Result<()> {
    let tickers = if tickers.is_empty() {
        normalize_tickers(&config.tickers)
    } else {
        normalize_tickers(tickers)
    };
    if tickers.is_empty() {
        anyhow::bail!("no tickers given and none configured");
    }

    let profile = profile.unwrap_or(config.scoring_profile);
    let outcome = BatchOrchestrator::from_config(provider, config, profile).run(&tickers).await;

    if json {
        let body = serde_json::to_string_pretty(&BatchResponse::from(&outcome))
            .context("failed to serialise batch response")?;
        println!("{body}");
        return Ok(());
    }

    println!("\nAnalyzing: {}\n", tickers.join(", "));
    for item in &outcome.results {
        match &item.outcome {
            Ok(result) => println!("{}", TextReport(result)),
            Err(e) => println!("Error: {} - {}\n", item.ticker, e),
        }
    }
    println!("{}", Summary(&outcome));
    Ok(())
}
