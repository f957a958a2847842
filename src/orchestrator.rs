// =============================================================================
// Batch Orchestrator — fetch + analyze a ticker list
// =============================================================================
//
// Fans out per-ticker fetch and analysis with bounded concurrency and fans
// back in preserving input order. A failing ticker becomes an error record;
// the batch itself never fails.
//
// Settings are captured when the orchestrator is built, so a configuration
// update during a batch never changes the batch in flight.
// =============================================================================

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{analyze, AnalysisResult, AnalysisSettings};
use crate::error::AnalysisError;
use crate::market_data::BarProvider;
use crate::runtime_config::RuntimeConfig;
use crate::types::{HistoryWindow, ScoringProfile};

/// Outcome for one requested ticker.
#[derive(Debug)]
pub struct TickerAnalysis {
    pub ticker: String,
    pub outcome: Result<AnalysisResult, AnalysisError>,
}

impl TickerAnalysis {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// One completed batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    pub profile: ScoringProfile,
    pub results: Vec<TickerAnalysis>,
}

impl BatchOutcome {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.is_ok()).count()
    }
}

pub struct BatchOrchestrator {
    provider: Arc<dyn BarProvider>,
    settings: AnalysisSettings,
    history: HistoryWindow,
    max_concurrent_fetches: usize,
}

impl BatchOrchestrator {
    pub fn new(
        provider: Arc<dyn BarProvider>,
        settings: AnalysisSettings,
        history: HistoryWindow,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            provider,
            settings,
            history,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Snapshot `config` for a batch scored with `profile`.
    pub fn from_config(provider: Arc<dyn BarProvider>, config: &RuntimeConfig, profile: ScoringProfile) -> Self {
        Self::new(
            provider,
            config.settings_for(profile),
            config.history_for(profile),
            config.max_concurrent_fetches,
        )
    }

    /// Analyze every ticker. Output order matches `tickers`.
    pub async fn run(&self, tickers: &[String]) -> BatchOutcome {
        let batch_id = Uuid::new_v4();
        info!(
            %batch_id,
            profile = %self.settings.profile,
            history = %self.history,
            concurrency = self.max_concurrent_fetches,
            tickers = ?tickers,
            "batch started"
        );

        let results: Vec<TickerAnalysis> = stream::iter(tickers.iter().cloned())
            .map(|ticker| self.analyze_one(ticker))
            .buffered(self.max_concurrent_fetches)
            .collect()
            .await;

        let outcome = BatchOutcome {
            batch_id,
            profile: self.settings.profile,
            results,
        };
        info!(
            %batch_id,
            total = outcome.results.len(),
            failed = outcome.failures(),
            "batch finished"
        );
        outcome
    }

    async fn analyze_one(&self, ticker: String) -> TickerAnalysis {
        let outcome = match self.provider.fetch_daily_bars(&ticker, self.history).await {
            Ok(bars) => analyze(&ticker, &bars, &self.settings),
            Err(e) => Err(AnalysisError::Fetch(e)),
        };

        match &outcome {
            Ok(result) => info!(
                ticker = %ticker,
                score = result.score(),
                recommendation = %result.recommendation(),
                "ticker analyzed"
            ),
            Err(e) => warn!(ticker = %ticker, error = %e, "ticker failed"),
        }

        TickerAnalysis { ticker, outcome }
    }
}

/// Trim and upper-case tickers, dropping blanks.
pub fn normalize_tickers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|t| t.as_ref().trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}
