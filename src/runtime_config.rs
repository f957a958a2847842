// =============================================================================
// Runtime Configuration — analyzer settings with atomic save
// =============================================================================
//
// Every tunable lives here: which scoring profile runs, which MACD and level
// strategies back it, indicator periods, default tickers and server
// settings.
//
// Persistence uses an atomic tmp + rename pattern. All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an
// older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::AnalysisSettings;
use crate::indicators::IndicatorParams;
use crate::types::{HistoryWindow, LevelMode, MacdMode, ScoringProfile};

pub const DEFAULT_CONFIG_PATH: &str = "analyzer_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_tickers() -> Vec<String> {
    vec!["TSLA".to_string(), "VOO".to_string(), "QQQ".to_string()]
}

fn default_max_concurrent_fetches() -> usize {
    1
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Strategy selection -------------------------------------------------

    /// Scoring heuristic applied to every ticker.
    #[serde(default)]
    pub scoring_profile: ScoringProfile,

    /// MACD mode override; `None` uses the profile's pairing.
    #[serde(default)]
    pub macd_mode: Option<MacdMode>,

    /// Level detector override; `None` uses the profile's pairing.
    #[serde(default)]
    pub level_mode: Option<LevelMode>,

    /// History window override; `None` uses the profile's pairing.
    #[serde(default)]
    pub history: Option<HistoryWindow>,

    /// Indicator look-back periods.
    #[serde(default)]
    pub indicators: IndicatorParams,

    // --- Batch ---------------------------------------------------------------

    /// Tickers analyzed when none are given on the command line.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,

    /// Upper bound on tickers fetched at once. 1 processes the batch
    /// sequentially.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    // --- Server --------------------------------------------------------------

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            scoring_profile: ScoringProfile::default(),
            macd_mode: None,
            level_mode: None,
            history: None,
            indicators: IndicatorParams::default(),
            tickers: default_tickers(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            profile = %config.scoring_profile,
            tickers = ?config.tickers,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Apply `ANALYZER_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(list) = std::env::var("ANALYZER_TICKERS") {
            let tickers = crate::orchestrator::normalize_tickers(list.split(','));
            if !tickers.is_empty() {
                self.tickers = tickers;
            }
        }
        if let Ok(addr) = std::env::var("ANALYZER_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(profile) = std::env::var("ANALYZER_PROFILE") {
            match profile.parse::<ScoringProfile>() {
                Ok(p) => self.scoring_profile = p,
                Err(e) => tracing::warn!(error = %e, "ignoring ANALYZER_PROFILE"),
            }
        }
    }

    /// Resolved analysis settings for `profile`, honouring mode overrides.
    pub fn settings_for(&self, profile: ScoringProfile) -> AnalysisSettings {
        let mut settings = AnalysisSettings::for_profile(profile);
        settings.params = self.indicators;
        if let Some(mode) = self.macd_mode {
            settings.macd_mode = mode;
        }
        if let Some(mode) = self.level_mode {
            settings.level_mode = mode;
        }
        settings
    }

    pub fn history_for(&self, profile: ScoringProfile) -> HistoryWindow {
        self.history.unwrap_or(profile.default_history())
    }
}
