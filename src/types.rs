// =============================================================================
// Shared types used across the analyzer
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar as delivered by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

/// Which scoring heuristic turns the indicator snapshot into a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringProfile {
    /// Eight equally weighted factors, score normalised to 0–100.
    #[serde(alias = "detailed")]
    Detailed,
    /// Unbounded weighted sum of a handful of rules.
    #[serde(alias = "lightweight")]
    Lightweight,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::Detailed
    }
}

impl ScoringProfile {
    pub fn default_macd_mode(self) -> MacdMode {
        match self {
            Self::Detailed => MacdMode::WithHistogramAndSignal,
            Self::Lightweight => MacdMode::MacdOnly,
        }
    }

    pub fn default_level_mode(self) -> LevelMode {
        match self {
            Self::Detailed => LevelMode::Clustered,
            Self::Lightweight => LevelMode::VolumeProfile,
        }
    }

    pub fn default_history(self) -> HistoryWindow {
        match self {
            Self::Detailed => HistoryWindow::OneYear,
            Self::Lightweight => HistoryWindow::SixMonths,
        }
    }
}

impl std::fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detailed => write!(f, "Detailed"),
            Self::Lightweight => write!(f, "Lightweight"),
        }
    }
}

impl std::str::FromStr for ScoringProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "lightweight" | "light" => Ok(Self::Lightweight),
            other => Err(format!("unknown scoring profile '{other}'")),
        }
    }
}

/// Whether MACD carries its signal line and histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdMode {
    WithHistogramAndSignal,
    MacdOnly,
}

/// Support/resistance detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelMode {
    /// Local extrema over the last 60 bars, volume-filtered and clustered.
    Clustered,
    /// Highest-volume bars over the whole series split around the price.
    VolumeProfile,
}

impl std::fmt::Display for LevelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clustered => write!(f, "Clustered"),
            Self::VolumeProfile => write!(f, "VolumeProfile"),
        }
    }
}

/// How much daily history to request from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryWindow {
    /// 365 calendar days.
    OneYear,
    /// Six calendar months.
    SixMonths,
}

impl HistoryWindow {
    /// First calendar day covered by the window ending at `end`.
    pub fn start_date(self, end: NaiveDate) -> NaiveDate {
        match self {
            Self::OneYear => end - chrono::Duration::days(365),
            Self::SixMonths => end
                .checked_sub_months(chrono::Months::new(6))
                .unwrap_or(end - chrono::Duration::days(182)),
        }
    }
}

impl std::fmt::Display for HistoryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneYear => write!(f, "1y"),
            Self::SixMonths => write!(f, "6mo"),
        }
    }
}

/// Categorical verdict derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "MODERATE BUY")]
    ModerateBuy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "AVOID")]
    Avoid,
}

impl Recommendation {
    /// Thresholds are inclusive at the lower bound of each band.
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::StrongBuy
        } else if score >= 50.0 {
            Self::ModerateBuy
        } else if score >= 25.0 {
            Self::Hold
        } else {
            Self::Avoid
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "STRONG BUY"),
            Self::ModerateBuy => write!(f, "MODERATE BUY"),
            Self::Hold => write!(f, "HOLD"),
            Self::Avoid => write!(f, "AVOID"),
        }
    }
}
