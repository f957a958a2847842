// =============================================================================
// 52-Week Range
// =============================================================================
//
// High / low over the trailing 252 closes (about one trading year), or the
// whole series when it is shorter.

use serde::{Deserialize, Serialize};

/// Trading days in a year.
pub const TRADING_YEAR: usize = 252;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRange {
    pub high: f64,
    pub low: f64,
}

impl YearRange {
    /// Percent the price sits below the high.
    pub fn distance_from_high(&self, price: f64) -> f64 {
        (self.high - price) / self.high * 100.0
    }

    /// Percent the price sits above the low.
    pub fn distance_from_low(&self, price: f64) -> f64 {
        (price - self.low) / self.low * 100.0
    }
}

/// Returns `None` for an empty series.
pub fn year_range(closes: &[f64]) -> Option<YearRange> {
    let start = closes.len().saturating_sub(TRADING_YEAR);
    let recent = &closes[start..];
    if recent.is_empty() {
        return None;
    }

    let (high, low) = recent
        .iter()
        .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), &c| (hi.max(c), lo.min(c)));
    Some(YearRange { high, low })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_no_range() {
        assert!(year_range(&[]).is_none());
    }

    #[test]
    fn short_series_uses_everything() {
        let r = year_range(&[3.0, 9.0, 1.0, 4.0]).unwrap();
        assert_eq!(r, YearRange { high: 9.0, low: 1.0 });
    }

    #[test]
    fn only_trailing_year_counts() {
        // An old spike beyond 252 bars must be ignored.
        let mut closes = vec![500.0];
        closes.extend(std::iter::repeat(100.0).take(TRADING_YEAR));
        let r = year_range(&closes).unwrap();
        assert_eq!(r.high, 100.0);
    }

    #[test]
    fn distances() {
        let r = YearRange { high: 200.0, low: 50.0 };
        assert_eq!(r.distance_from_high(150.0), 25.0);
        assert_eq!(r.distance_from_low(75.0), 50.0);
    }
}
