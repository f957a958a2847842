// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// scorer. Series-producing functions return `Vec<Option<f64>>` aligned
// index-for-index with the input bars: `None` marks "not yet computable" and
// is propagated through every dependent calculation.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod range;
pub mod rsi;
pub mod volume;
pub mod window;

use serde::{Deserialize, Serialize};

pub use bollinger::{BollingerBands, BollingerParams};
pub use macd::{MacdParams, MacdSeries};
pub use range::YearRange;

/// Look-back periods for every indicator the analyzer computes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default)]
    pub macd: MacdParams,
    #[serde(default)]
    pub bollinger: BollingerParams,
    #[serde(default = "default_sma_short")]
    pub sma_short: usize,
    #[serde(default = "default_sma_medium")]
    pub sma_medium: usize,
    #[serde(default = "default_sma_long")]
    pub sma_long: usize,
    #[serde(default = "default_volume_period")]
    pub volume_period: usize,
}

fn default_rsi_period() -> usize {
    14
}

fn default_sma_short() -> usize {
    20
}

fn default_sma_medium() -> usize {
    50
}

fn default_sma_long() -> usize {
    200
}

fn default_volume_period() -> usize {
    20
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd: MacdParams::default(),
            bollinger: BollingerParams::default(),
            sma_short: default_sma_short(),
            sma_medium: default_sma_medium(),
            sma_long: default_sma_long(),
            volume_period: default_volume_period(),
        }
    }
}
