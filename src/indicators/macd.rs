// =============================================================================
// MACD — Moving Average Convergence / Divergence
// =============================================================================
//
//   macd[i]      = EMA_fast[i] - EMA_slow[i]          (where both defined)
//   signal       = EMA(defined MACD values, signal)   (compacted index space)
//   histogram[i] = macd[i] - signal[i]                (where both defined)
//
// The signal EMA runs over the compacted sequence of defined MACD values and
// is mapped back onto the original indices by walking MACD's defined
// positions in order.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::ema::calculate_ema;
use crate::types::MacdMode;

/// Fast / slow / signal periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Signal line and histogram, aligned with the MACD line.
#[derive(Debug, Clone)]
pub struct MacdSignal {
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// Full MACD output. `signal` is absent in [`MacdMode::MacdOnly`].
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Option<MacdSignal>,
}

pub fn calculate_macd(closes: &[f64], params: MacdParams, mode: MacdMode) -> MacdSeries {
    let ema_fast = calculate_ema(closes, params.fast);
    let ema_slow = calculate_ema(closes, params.slow);

    let macd: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| match (fast, slow) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let signal = match mode {
        MacdMode::WithHistogramAndSignal => Some(signal_line(&macd, params.signal)),
        MacdMode::MacdOnly => None,
    };

    MacdSeries { macd, signal }
}

fn signal_line(macd: &[Option<f64>], period: usize) -> MacdSignal {
    let compacted: Vec<f64> = macd.iter().flatten().copied().collect();
    let compact_signal = calculate_ema(&compacted, period);

    let mut signal = vec![None; macd.len()];
    let mut compact_idx = 0;
    for (i, value) in macd.iter().enumerate() {
        if value.is_some() {
            signal[i] = compact_signal.get(compact_idx).copied().flatten();
            compact_idx += 1;
        }
    }

    let histogram = macd
        .iter()
        .zip(&signal)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSignal { signal, histogram }
}
