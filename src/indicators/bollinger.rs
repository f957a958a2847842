// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), with σ the population standard deviation of
// the same window.
//
// bbPosition = (close - lower) / (upper - lower) * 100 places the close
// inside the envelope (0 = lower band, 100 = upper band).

use serde::{Deserialize, Serialize};

use crate::indicators::window::{rolling_mean, rolling_std_dev};

/// Window length and band multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    pub period: usize,
    pub num_std: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            num_std: 2.0,
        }
    }
}

/// Band arrays aligned with the close series.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn calculate_bollinger(closes: &[f64], params: BollingerParams) -> BollingerBands {
    let middle = rolling_mean(closes, params.period);
    let std_dev = rolling_std_dev(closes, params.period, &middle);

    let (upper, lower): (Vec<Option<f64>>, Vec<Option<f64>>) = middle
        .iter()
        .zip(&std_dev)
        .map(|(m, sd)| match (m, sd) {
            (Some(m), Some(sd)) => (Some(m + params.num_std * sd), Some(m - params.num_std * sd)),
            _ => (None, None),
        })
        .unzip();

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Position of `close` within the band, in percent.
///
/// Returns `None` when either band is undefined or the band has zero width.
pub fn band_position(close: f64, upper: Option<f64>, lower: Option<f64>) -> Option<f64> {
    let (upper, lower) = (upper?, lower?);
    if upper == lower {
        return None;
    }
    Some((close - lower) / (upper - lower) * 100.0)
}
