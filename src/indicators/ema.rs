// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The first EMA value (index `period - 1`) is seeded with the SMA of the first
// `period` closes. The update is written in the difference form above so that
// outputs match reference values exactly; do not rewrite it as
// `close * m + prev * (1 - m)`.
// =============================================================================

/// Compute the EMA series for `series` and look-back `period`.
///
/// The result is aligned with the input: indices before `period - 1` are
/// `None`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `series.len() < period` => all `None`
pub fn calculate_ema(series: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; series.len()];
    if period == 0 || series.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let seed = series[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(seed);

    let mut prev = seed;
    for (i, &value) in series.iter().enumerate().skip(period) {
        let ema = (value - prev) * multiplier + prev;
        out[i] = Some(ema);
        prev = ema;
    }

    out
}
