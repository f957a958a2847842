// =============================================================================
// Instrument Analysis — bars in, scored result out
// =============================================================================
//
// Pipeline for one ticker:
//   1. Validate the bar sequence
//   2. Compute every indicator array (index-aligned with the bars)
//   3. Detect support / resistance with the configured strategy
//   4. Take the latest-index snapshot
//   5. Score it with the configured profile
//
// Pure: no I/O, no shared state. Identical bars and settings always give an
// identical result.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnalysisError;
use crate::indicators::bollinger::{band_position, calculate_bollinger};
use crate::indicators::macd::calculate_macd;
use crate::indicators::range::year_range;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::volume::{average_volume, volume_ratio};
use crate::indicators::window::{latest, previous, rolling_mean};
use crate::indicators::{BollingerBands, IndicatorParams, MacdSeries, YearRange};
use crate::levels::{detect_levels, LevelSet};
use crate::signals::{self, IndicatorSnapshot, ScoringResult};
use crate::types::{Bar, LevelMode, MacdMode, Recommendation, ScoringProfile};

/// Resolved strategy selection for one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    pub profile: ScoringProfile,
    pub macd_mode: MacdMode,
    pub level_mode: LevelMode,
    pub params: IndicatorParams,
}

impl AnalysisSettings {
    /// Settings with the modes the profile is normally paired with.
    pub fn for_profile(profile: ScoringProfile) -> Self {
        Self {
            profile,
            macd_mode: profile.default_macd_mode(),
            level_mode: profile.default_level_mode(),
            params: IndicatorParams::default(),
        }
    }
}

// =============================================================================
// Indicator arrays
// =============================================================================

/// Every indicator array for one instrument, aligned with its bars.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub sma_short: Vec<Option<f64>>,
    pub sma_medium: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: MacdSeries,
    pub bollinger: BollingerBands,
    pub avg_volume: Vec<Option<f64>>,
    pub year_range: Option<YearRange>,
}

impl IndicatorSet {
    pub fn compute(closes: &[f64], volumes: &[f64], params: &IndicatorParams, macd_mode: MacdMode) -> Self {
        Self {
            sma_short: rolling_mean(closes, params.sma_short),
            sma_medium: rolling_mean(closes, params.sma_medium),
            sma_long: rolling_mean(closes, params.sma_long),
            rsi: calculate_rsi(closes, params.rsi_period),
            macd: calculate_macd(closes, params.macd, macd_mode),
            bollinger: calculate_bollinger(closes, params.bollinger),
            avg_volume: average_volume(volumes, params.volume_period),
            year_range: year_range(closes),
        }
    }

    /// Latest-index view. `price` and `volume` are the last bar's values.
    pub fn snapshot(&self, price: f64, volume: f64) -> IndicatorSnapshot {
        let (macd_signal, macd_histogram, prev_macd_signal) = match &self.macd.signal {
            Some(sig) => (latest(&sig.signal), latest(&sig.histogram), previous(&sig.signal)),
            None => (None, None, None),
        };
        let bb_upper = latest(&self.bollinger.upper);
        let bb_lower = latest(&self.bollinger.lower);
        let avg_volume = latest(&self.avg_volume);

        IndicatorSnapshot {
            price,
            volume,
            rsi: latest(&self.rsi),
            macd: latest(&self.macd.macd),
            macd_signal,
            macd_histogram,
            prev_macd: previous(&self.macd.macd),
            prev_macd_signal,
            sma_short: latest(&self.sma_short),
            sma_medium: latest(&self.sma_medium),
            sma_long: latest(&self.sma_long),
            bb_upper,
            bb_middle: latest(&self.bollinger.middle),
            bb_lower,
            bb_position: band_position(price, bb_upper, bb_lower),
            avg_volume,
            volume_ratio: volume_ratio(volume, avg_volume),
            year_high: self.year_range.map(|r| r.high),
            year_low: self.year_range.map(|r| r.low),
            distance_from_high: self.year_range.map(|r| r.distance_from_high(price)),
            distance_from_low: self.year_range.map(|r| r.distance_from_low(price)),
        }
    }
}

// =============================================================================
// Result record
// =============================================================================

/// Per-instrument output. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub bar_count: usize,
    pub indicators: IndicatorSnapshot,
    pub levels: LevelSet,
    pub scoring: ScoringResult,
}

impl AnalysisResult {
    pub fn current_price(&self) -> f64 {
        self.indicators.price
    }

    pub fn score(&self) -> f64 {
        self.scoring.score
    }

    pub fn recommendation(&self) -> Recommendation {
        self.scoring.recommendation
    }

    pub fn tags(&self) -> &[String] {
        &self.scoring.tags
    }
}

/// Analyze one instrument's bars.
pub fn analyze(ticker: &str, bars: &[Bar], settings: &AnalysisSettings) -> Result<AnalysisResult, AnalysisError> {
    let last = bars.last().ok_or_else(|| AnalysisError::NoData(ticker.to_string()))?;
    validate(ticker, bars)?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

    let indicators = IndicatorSet::compute(&closes, &volumes, &settings.params, settings.macd_mode);
    let levels = detect_levels(&closes, &volumes, settings.level_mode);
    let snapshot = indicators.snapshot(last.close, last.volume as f64);
    let scoring = signals::score(settings.profile, &snapshot, &levels);

    debug!(
        ticker,
        bars = bars.len(),
        profile = %settings.profile,
        levels = %settings.level_mode,
        score = scoring.score,
        recommendation = %scoring.recommendation,
        "instrument analyzed"
    );

    Ok(AnalysisResult {
        ticker: ticker.to_string(),
        as_of: last.date,
        bar_count: bars.len(),
        indicators: snapshot,
        levels,
        scoring,
    })
}

fn validate(ticker: &str, bars: &[Bar]) -> Result<(), AnalysisError> {
    let invalid = |reason: String| AnalysisError::InvalidBars {
        ticker: ticker.to_string(),
        reason,
    };

    if let Some(bar) = bars.iter().find(|b| !b.close.is_finite()) {
        return Err(invalid(format!("non-finite close on {}", bar.date)));
    }
    if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(invalid(format!(
            "bars out of order or duplicated at {} -> {}",
            pair[0].date, pair[1].date
        )));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn day(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Duration::days(i as i64)
    }

    fn bars_from(closes: &[f64], volumes: &[u64]) -> Vec<Bar> {
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| Bar::new(day(i), c, v))
            .collect()
    }

    fn flat_bars() -> Vec<Bar> {
        bars_from(&[50.0; 300], &[1000; 300])
    }

    #[test]
    fn flat_series_end_to_end_lightweight() {
        let settings = AnalysisSettings::for_profile(ScoringProfile::Lightweight);
        let result = analyze("FLAT", &flat_bars(), &settings).unwrap();
        let s = &result.indicators;

        assert_eq!(s.sma_short, Some(50.0));
        assert_eq!(s.sma_medium, Some(50.0));
        assert_eq!(s.sma_long, Some(50.0));
        assert_eq!(s.rsi, None);
        assert_eq!(s.bb_upper, s.bb_lower);
        assert_eq!(s.bb_position, None);
        assert_eq!(s.macd, Some(0.0));
        assert_eq!(s.macd_signal, None);
        assert_eq!(s.volume_ratio, Some(1.0));
        assert!(result.levels.is_empty());

        assert_eq!(result.score(), 0.0);
        assert!(result.tags().is_empty());
        assert_eq!(result.recommendation(), Recommendation::Avoid);
    }

    #[test]
    fn flat_series_has_zero_width_bands_everywhere() {
        let closes = vec![50.0; 300];
        let volumes = vec![1000.0; 300];
        let set = IndicatorSet::compute(&closes, &volumes, &IndicatorParams::default(), MacdMode::MacdOnly);
        for i in 19..300 {
            assert_eq!(set.bollinger.upper[i], set.bollinger.lower[i]);
        }
        assert!(set.rsi.iter().all(Option::is_none));
    }

    #[test]
    fn flat_series_end_to_end_detailed() {
        let settings = AnalysisSettings::for_profile(ScoringProfile::Detailed);
        let result = analyze("FLAT", &flat_bars(), &settings).unwrap();
        // Mixed MAs, normal volume and no nearby resistance: 1.5 of 8.
        assert_eq!(result.score(), 18.75);
        assert_eq!(result.indicators.macd_signal, Some(0.0));
        assert_eq!(result.indicators.macd_histogram, Some(0.0));
        assert_eq!(result.recommendation(), Recommendation::Avoid);
    }

    #[test]
    fn all_arrays_match_bar_length() {
        let closes: Vec<f64> = (0..75).map(|i| 100.0 + (i as f64 / 4.0).sin() * 5.0).collect();
        let volumes = vec![1000.0; 75];
        let set = IndicatorSet::compute(&closes, &volumes, &IndicatorParams::default(), MacdMode::WithHistogramAndSignal);
        let sig = set.macd.signal.as_ref().unwrap();
        for len in [
            set.sma_short.len(),
            set.sma_medium.len(),
            set.sma_long.len(),
            set.rsi.len(),
            set.macd.macd.len(),
            sig.signal.len(),
            sig.histogram.len(),
            set.bollinger.upper.len(),
            set.avg_volume.len(),
        ] {
            assert_eq!(len, 75);
        }
        assert!(set.sma_long.iter().all(Option::is_none));
    }

    #[test]
    fn short_history_leaves_indicators_undefined() {
        let bars = bars_from(&[10.0, 11.0, 12.0], &[100, 200, 300]);
        let result = analyze("NEW", &bars, &AnalysisSettings::for_profile(ScoringProfile::Detailed)).unwrap();
        let s = &result.indicators;
        assert_eq!(s.rsi, None);
        assert_eq!(s.sma_short, None);
        assert_eq!(s.macd, None);
        assert_eq!(s.avg_volume, None);
        assert_eq!(s.year_high, Some(12.0));
        assert_eq!(s.distance_from_low, Some(20.0));
    }

    #[test]
    fn empty_bars_is_no_data() {
        let err = analyze("NONE", &[], &AnalysisSettings::for_profile(ScoringProfile::Detailed)).unwrap_err();
        assert!(matches!(err, AnalysisError::NoData(t) if t == "NONE"));
    }

    #[test]
    fn unordered_bars_are_rejected() {
        let mut bars = bars_from(&[1.0, 2.0, 3.0], &[1, 1, 1]);
        bars.swap(0, 2);
        let err = analyze("BAD", &bars, &AnalysisSettings::for_profile(ScoringProfile::Detailed)).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidBars { .. }));
    }

    #[test]
    fn nan_close_is_rejected() {
        let bars = bars_from(&[1.0, f64::NAN], &[1, 1]);
        let err = analyze("NAN", &bars, &AnalysisSettings::for_profile(ScoringProfile::Lightweight)).unwrap_err();
        assert!(err.to_string().contains("non-finite close"));
    }

    #[test]
    fn rising_series_detailed_snapshot() {
        let closes: Vec<f64> = (1..=260).map(|x| 100.0 + x as f64).collect();
        let bars = bars_from(&closes, &vec![1000; 260]);
        let result = analyze("UP", &bars, &AnalysisSettings::for_profile(ScoringProfile::Detailed)).unwrap();
        assert_eq!(result.indicators.rsi, Some(100.0));
        assert_eq!(result.indicators.distance_from_high, Some(0.0));
        assert!(result.tags().contains(&"Strong Uptrend".to_string()));
        assert!(result.tags().contains(&"Long-term Uptrend".to_string()));
        assert_eq!(result.as_of, day(259));
    }
}
