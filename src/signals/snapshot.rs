// =============================================================================
// Indicator Snapshot — latest-index view consumed by the scorers
// =============================================================================

use serde::{Deserialize, Serialize};

/// Every indicator's value at the last bar (plus the previous bar's MACD and
/// signal for crossover detection). `None` means not computable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub volume: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub prev_macd: Option<f64>,
    pub prev_macd_signal: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_medium: Option<f64>,
    pub sma_long: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_position: Option<f64>,
    pub avg_volume: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub year_high: Option<f64>,
    pub year_low: Option<f64>,
    pub distance_from_high: Option<f64>,
    pub distance_from_low: Option<f64>,
}

/// `a > b`, false when either side is undefined.
pub fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// `a < b`, false when either side is undefined.
pub fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// `a <= b`, false when either side is undefined.
pub fn le(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a <= b)
}
