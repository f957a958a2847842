// =============================================================================
// Relative Strength Index (RSI) — windowed scan
// =============================================================================
//
// For every index i >= period the gains and losses are re-derived from the
// `period` one-step changes ending at i. Nothing is carried over from the
// previous index, so this is NOT Wilder's smoothed RSI and will differ from
// exchange charting packages.
//
//   avg_gain = sum(positive changes) / period
//   avg_loss = sum(|non-positive changes|) / period
//   RS       = avg_gain / avg_loss
//   RSI      = 100 - 100 / (1 + RS)
//
// Degenerate windows:
//   avg_loss == 0, avg_gain > 0  => RS = +inf => RSI = 100 (arises naturally)
//   avg_loss == 0, avg_gain == 0 => RS = NaN  => undefined
// =============================================================================

/// Compute the RSI series for `closes`, aligned with the input.
///
/// Indices `< period` are `None`, as is any index whose window has no
/// movement at all.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }

    let period_f = period as f64;
    for i in period..closes.len() {
        let (gains, losses) = closes[i - period..=i]
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold((0.0_f64, 0.0_f64), |(g, l), change| {
                if change > 0.0 {
                    (g + change, l)
                } else {
                    (g, l + change.abs())
                }
            });

        let avg_gain = gains / period_f;
        let avg_loss = losses / period_f;
        let rs = avg_gain / avg_loss;
        let rsi = 100.0 - 100.0 / (1.0 + rs);

        if !rsi.is_nan() {
            out[i] = Some(rsi);
        }
    }

    out
}

/// Human-readable zone for an RSI value.
pub fn rsi_zone(value: f64) -> &'static str {
    if value >= 70.0 {
        "OVERBOUGHT"
    } else if value <= 30.0 {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert_eq!(calculate_rsi(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 changes, no index reaches a full window.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_first_value_at_period_index() {
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi[13], None);
        assert_eq!(rsi[14], Some(100.0));
    }

    #[test]
    fn rsi_all_gains_saturates_at_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        for v in &series[14..] {
            assert_eq!(*v, Some(100.0));
        }
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        for v in &series[14..] {
            assert_eq!(*v, Some(0.0));
        }
    }

    #[test]
    fn rsi_flat_market_is_undefined_not_fifty() {
        let series = calculate_rsi(&[100.0; 30], 14);
        assert!(series.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_scan_does_not_smooth() {
        // After a long rally a single window of pure losses must read 0,
        // which a smoothed RSI would never do.
        let mut closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let top = *closes.last().unwrap();
        closes.extend((1..=5).map(|k| top - k as f64));
        let rsi = calculate_rsi(&closes, 5);
        assert_eq!(*rsi.last().unwrap(), Some(0.0));
    }

    #[test]
    fn rsi_known_window() {
        // Changes: +1, -2, +3, -1 => gains 4, losses 3 => RS 4/3 => RSI 57.142857...
        let closes = [10.0, 11.0, 9.0, 12.0, 11.0];
        let rsi = calculate_rsi(&closes, 4);
        let expected = 100.0 - 100.0 / (1.0 + 4.0 / 3.0);
        assert!((rsi[4].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn zone_labels() {
        assert_eq!(rsi_zone(100.0), "OVERBOUGHT");
        assert_eq!(rsi_zone(0.0), "OVERSOLD");
        assert_eq!(rsi_zone(50.0), "NEUTRAL");
    }
}
