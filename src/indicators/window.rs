// =============================================================================
// Windowed Statistics — rolling mean / rolling standard deviation
// =============================================================================
//
// Every function returns a vector aligned index-for-index with its input.
// Positions before the first full window are `None`: "not yet computable" is
// never represented as 0.0 or NaN.
// =============================================================================

/// Trailing simple moving average.
///
/// Index `i >= window - 1` holds the arithmetic mean of
/// `series[i + 1 - window ..= i]`; earlier indices are `None`.
///
/// Each window is summed afresh from left to right so the value at
/// `window - 1` is bit-identical to the EMA seed.
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; series.len()];
    if window == 0 || series.len() < window {
        return out;
    }

    let divisor = window as f64;
    for i in (window - 1)..series.len() {
        let sum: f64 = series[i + 1 - window..=i].iter().sum();
        out[i] = Some(sum / divisor);
    }
    out
}

/// Population standard deviation of the trailing window around `mean[i]`.
///
/// Divides by `window`, not `window - 1`. Indices where `mean` is undefined
/// stay undefined.
pub fn rolling_std_dev(series: &[f64], window: usize, mean: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = vec![None; series.len()];
    if window == 0 || series.len() < window {
        return out;
    }

    let divisor = window as f64;
    for i in (window - 1)..series.len() {
        let Some(m) = mean.get(i).copied().flatten() else {
            continue;
        };
        let sum_sq: f64 = series[i + 1 - window..=i]
            .iter()
            .map(|x| (x - m).powi(2))
            .sum();
        out[i] = Some((sum_sq / divisor).sqrt());
    }
    out
}

/// Value at the last index, if defined.
pub fn latest(values: &[Option<f64>]) -> Option<f64> {
    values.last().copied().flatten()
}

/// Value at the second-to-last index, if defined.
pub fn previous(values: &[Option<f64>]) -> Option<f64> {
    values.len().checked_sub(2).and_then(|i| values[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_is_aligned_and_undefined_before_window() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = rolling_mean(&series, 3);
        assert_eq!(sma.len(), series.len());
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], Some(2.0));
        assert_eq!(sma[3], Some(3.0));
        assert_eq!(sma[4], Some(4.0));
    }

    #[test]
    fn mean_with_short_series_is_all_undefined() {
        let sma = rolling_mean(&[1.0, 2.0], 5);
        assert_eq!(sma, vec![None, None]);
    }

    #[test]
    fn mean_with_zero_window_is_all_undefined() {
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn std_dev_is_population() {
        // Window [2, 4, 4, 4, 5, 5, 7, 9] has mean 5 and population sd 2.
        let series = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mean = rolling_mean(&series, 8);
        let sd = rolling_std_dev(&series, 8, &mean);
        assert_eq!(sd[6], None);
        assert!((sd[7].unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn std_dev_follows_undefined_mean() {
        let series = [1.0, 2.0, 3.0];
        let mean = vec![None, None, None];
        assert!(rolling_std_dev(&series, 2, &mean).iter().all(Option::is_none));
    }

    #[test]
    fn latest_and_previous() {
        let values = [None, Some(1.0), Some(2.0)];
        assert_eq!(latest(&values), Some(2.0));
        assert_eq!(previous(&values), Some(1.0));
        assert_eq!(previous(&values[..1]), None);
        assert_eq!(latest(&[]), None);
    }
}
