// =============================================================================
// Report — display records for the HTTP and CLI surfaces
// =============================================================================
//
// `AnalysisReport` is the flat camelCase JSON record: prices rounded to 2dp,
// percentages and score to 1dp, volumes as millions strings ("12.34M"),
// tags joined with ", " (or "None"). Undefined and non-finite values become
// `null`. The text views print "N/A" for them instead.
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::indicators::rsi::rsi_zone;
use crate::levels::{Level, LevelSet};
use crate::orchestrator::BatchOutcome;
use crate::types::{LevelMode, Recommendation, ScoringProfile};

/// Round to `dp` decimals; `None` for undefined or non-finite input.
fn round_to(value: Option<f64>, dp: i32) -> Option<f64> {
    let v = value.filter(|v| v.is_finite())?;
    let scale = 10f64.powi(dp);
    Some((v * scale).round() / scale)
}

fn millions(value: f64) -> String {
    format!("{:.2}M", value / 1_000_000.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelReport {
    pub price: f64,
    /// Merge count; only meaningful for clustered levels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl LevelReport {
    fn from_level(level: &Level, mode: LevelMode) -> Self {
        Self {
            price: round_to(Some(level.price), 2).unwrap_or(level.price),
            count: match mode {
                LevelMode::Clustered => Some(level.count),
                LevelMode::VolumeProfile => None,
            },
        }
    }
}

fn level_reports(levels: &[Level], mode: LevelMode) -> Vec<LevelReport> {
    levels.iter().map(|l| LevelReport::from_level(l, mode)).collect()
}

/// Flat per-instrument display record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub ticker: String,
    pub current_price: f64,
    pub score: f64,
    pub recommendation: Recommendation,
    pub signals: String,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_position: Option<f64>,
    pub volume: String,
    pub avg_volume: Option<String>,
    pub volume_ratio: Option<f64>,
    pub week52_high: Option<f64>,
    pub week52_low: Option<f64>,
    pub distance_from_high: Option<f64>,
    pub distance_from_low: Option<f64>,
    pub support: Vec<LevelReport>,
    pub resistance: Vec<LevelReport>,
}

impl From<&AnalysisResult> for AnalysisReport {
    fn from(result: &AnalysisResult) -> Self {
        let s = &result.indicators;
        let levels: &LevelSet = &result.levels;
        let signals = if result.tags().is_empty() {
            "None".to_string()
        } else {
            result.tags().join(", ")
        };

        Self {
            ticker: result.ticker.clone(),
            current_price: round_to(Some(s.price), 2).unwrap_or(s.price),
            score: round_to(Some(result.score()), 1).unwrap_or(0.0),
            recommendation: result.recommendation(),
            signals,
            rsi: round_to(s.rsi, 2),
            macd: round_to(s.macd, 2),
            macd_signal: round_to(s.macd_signal, 2),
            macd_histogram: round_to(s.macd_histogram, 2),
            sma20: round_to(s.sma_short, 2),
            sma50: round_to(s.sma_medium, 2),
            sma200: round_to(s.sma_long, 2),
            bb_upper: round_to(s.bb_upper, 2),
            bb_lower: round_to(s.bb_lower, 2),
            bb_position: round_to(s.bb_position, 1),
            volume: millions(s.volume),
            avg_volume: s.avg_volume.filter(|v| v.is_finite()).map(millions),
            volume_ratio: round_to(s.volume_ratio, 2),
            week52_high: round_to(s.year_high, 2),
            week52_low: round_to(s.year_low, 2),
            distance_from_high: round_to(s.distance_from_high, 1),
            distance_from_low: round_to(s.distance_from_low, 1),
            support: level_reports(&levels.support, levels.mode),
            resistance: level_reports(&levels.resistance, levels.mode),
        }
    }
}

/// One entry of a batch response: a report or a per-ticker error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchRecord {
    Report(Box<AnalysisReport>),
    Error { ticker: String, error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub profile: ScoringProfile,
    pub results: Vec<BatchRecord>,
}

impl From<&BatchOutcome> for BatchResponse {
    fn from(outcome: &BatchOutcome) -> Self {
        let results = outcome
            .results
            .iter()
            .map(|r| match &r.outcome {
                Ok(result) => BatchRecord::Report(Box::new(AnalysisReport::from(result))),
                Err(e) => BatchRecord::Error {
                    ticker: r.ticker.clone(),
                    error: e.to_string(),
                },
            })
            .collect();

        Self {
            batch_id: outcome.batch_id,
            profile: outcome.profile,
            results,
        }
    }
}

// =============================================================================
// Text rendering
// =============================================================================

struct Na(Option<f64>, usize);

impl fmt::Display for Na {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.filter(|v| v.is_finite()) {
            Some(v) => write!(f, "{:.*}", self.1, v),
            None => write!(f, "N/A"),
        }
    }
}

fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(60))
}

/// Full per-ticker text report.
pub struct TextReport<'a>(pub &'a AnalysisResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let s = &r.indicators;

        rule(f)?;
        writeln!(f, "{} Analysis - {} ({} bars, {} profile)", r.ticker, r.as_of, r.bar_count, r.scoring.profile)?;
        rule(f)?;
        writeln!(f, "\nCurrent Price: ${:.2}", s.price)?;

        writeln!(f, "\n52-Week Range:")?;
        writeln!(f, "  High: ${} ({}% below)", Na(s.year_high, 2), Na(s.distance_from_high, 1))?;
        writeln!(f, "  Low:  ${} ({}% above)", Na(s.year_low, 2), Na(s.distance_from_low, 1))?;

        writeln!(f, "\nMoving Averages:")?;
        writeln!(f, "  20-day SMA:  ${}", Na(s.sma_short, 2))?;
        writeln!(f, "  50-day SMA:  ${}", Na(s.sma_medium, 2))?;
        writeln!(f, "  200-day SMA: ${}", Na(s.sma_long, 2))?;

        writeln!(f, "\nBollinger Bands (20, 2):")?;
        writeln!(f, "  Upper: ${}", Na(s.bb_upper, 2))?;
        writeln!(f, "  Lower: ${}", Na(s.bb_lower, 2))?;
        writeln!(f, "  Position: {}% (0%=lower, 100%=upper)", Na(s.bb_position, 1))?;

        writeln!(f, "\nTechnical Indicators:")?;
        match s.rsi.filter(|v| v.is_finite()) {
            Some(v) => writeln!(f, "  RSI (14):    {:.2} ({})", v, rsi_zone(v))?,
            None => writeln!(f, "  RSI (14):    N/A")?,
        }
        writeln!(f, "  MACD:        {}", Na(s.macd, 2))?;
        writeln!(f, "  Signal Line: {}", Na(s.macd_signal, 2))?;
        writeln!(f, "  MACD Hist:   {}", Na(s.macd_histogram, 2))?;

        writeln!(f, "\nVolume:")?;
        writeln!(f, "  Current: {}", millions(s.volume))?;
        match s.avg_volume.filter(|v| v.is_finite()) {
            Some(v) => writeln!(f, "  20-day Avg: {}", millions(v))?,
            None => writeln!(f, "  20-day Avg: N/A")?,
        }
        let flow = match s.volume_ratio {
            Some(v) if v > 1.2 => " (High)",
            Some(v) if v < 0.8 => " (Low)",
            Some(_) => " (Normal)",
            None => "",
        };
        writeln!(f, "  Ratio: {}x{}", Na(s.volume_ratio, 2), flow)?;

        writeln!(f, "\nSupport/Resistance Levels:")?;
        if r.levels.is_empty() {
            writeln!(f, "  No strong levels detected")?;
        }
        for (i, l) in r.levels.support.iter().enumerate() {
            writeln!(f, "  Support {}: ${:.2}", i + 1, l.price)?;
        }
        for (i, l) in r.levels.resistance.iter().enumerate() {
            writeln!(f, "  Resistance {}: ${:.2}", i + 1, l.price)?;
        }

        writeln!(f, "\nFactors:")?;
        if r.scoring.contributions.is_empty() {
            writeln!(f, "  (none fired)")?;
        }
        for c in &r.scoring.contributions {
            writeln!(f, "  {:<24} {:+.1}", c.factor, c.points)?;
        }
        if !r.tags().is_empty() {
            writeln!(f, "  Signals: {}", r.tags().join(", "))?;
        }

        writeln!(f)?;
        rule(f)?;
        writeln!(f, "Buy Signal Strength: {:.1}%", r.score())?;
        writeln!(f, "Recommendation: {}", r.recommendation())?;
        rule(f)
    }
}

/// Score-sorted batch summary. Failed tickers are listed after the ranking.
pub struct Summary<'a>(pub &'a BatchOutcome);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ranked: Vec<&AnalysisResult> = self.0.results.iter().filter_map(|r| r.outcome.as_ref().ok()).collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));

        rule(f)?;
        writeln!(f, "SUMMARY")?;
        rule(f)?;
        for (i, r) in ranked.iter().enumerate() {
            writeln!(
                f,
                "{}. {:<6} ${:>8.2} - Signal: {:.1}% ({})",
                i + 1,
                r.ticker,
                r.current_price(),
                r.score(),
                r.recommendation()
            )?;
        }
        for r in &self.0.results {
            if let Err(e) = &r.outcome {
                writeln!(f, "-. {:<6} Error: {}", r.ticker, e)?;
            }
        }
        writeln!(f, "\nFor educational purposes only. Not financial advice.")?;
        rule(f)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::error::AnalysisError;
    use crate::levels::LevelKind;
    use crate::orchestrator::TickerAnalysis;
    use crate::signals::{IndicatorSnapshot, ScoringResult, SignalContribution};

    fn sample(ticker: &str, score: f64, mode: LevelMode) -> AnalysisResult {
        AnalysisResult {
            ticker: ticker.to_string(),
            as_of: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            bar_count: 250,
            indicators: IndicatorSnapshot {
                price: 123.456,
                volume: 12_345_678.0,
                rsi: Some(28.123),
                macd: Some(-0.004),
                sma_short: Some(120.0),
                bb_position: Some(f64::NAN),
                avg_volume: Some(10_000_000.0),
                volume_ratio: Some(1.2345678),
                distance_from_high: Some(22.26),
                ..Default::default()
            },
            levels: LevelSet {
                mode,
                support: vec![Level { price: 121.254, kind: LevelKind::Support, count: 3 }],
                resistance: Vec::new(),
            },
            scoring: ScoringResult {
                profile: ScoringProfile::Detailed,
                score,
                recommendation: Recommendation::from_score(score),
                tags: vec!["RSI Oversold".into(), "Far from High".into()],
                contributions: vec![SignalContribution { factor: "rsi".into(), points: 1.0 }],
            },
        }
    }

    #[test]
    fn report_rounds_and_formats() {
        let report = AnalysisReport::from(&sample("TSLA", 56.25, LevelMode::Clustered));
        assert_eq!(report.current_price, 123.46);
        assert_eq!(report.score, 56.3);
        assert_eq!(report.rsi, Some(28.12));
        assert_eq!(report.macd, Some(-0.0));
        assert_eq!(report.bb_position, None);
        assert_eq!(report.volume, "12.35M");
        assert_eq!(report.avg_volume.as_deref(), Some("10.00M"));
        assert_eq!(report.volume_ratio, Some(1.23));
        assert_eq!(report.distance_from_high, Some(22.3));
        assert_eq!(report.signals, "RSI Oversold, Far from High");
        assert_eq!(report.recommendation, Recommendation::ModerateBuy);
    }

    #[test]
    fn report_json_shape() {
        let report = AnalysisReport::from(&sample("TSLA", 80.0, LevelMode::Clustered));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["currentPrice"], 123.46);
        assert_eq!(json["recommendation"], "STRONG BUY");
        assert!(json["sma200"].is_null());
        assert!(json["week52High"].is_null());
        assert_eq!(json["support"][0]["count"], 3);
        assert_eq!(json["support"][0]["price"], 121.25);
    }

    #[test]
    fn volume_profile_levels_omit_count() {
        let report = AnalysisReport::from(&sample("VOO", 10.0, LevelMode::VolumeProfile));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["support"][0].get("count").is_none());
    }

    #[test]
    fn empty_tags_render_as_none() {
        let mut result = sample("QQQ", 0.0, LevelMode::Clustered);
        result.scoring.tags.clear();
        assert_eq!(AnalysisReport::from(&result).signals, "None");
    }

    fn outcome() -> BatchOutcome {
        BatchOutcome {
            batch_id: Uuid::nil(),
            profile: ScoringProfile::Detailed,
            results: vec![
                TickerAnalysis { ticker: "LOW".into(), outcome: Ok(sample("LOW", 12.5, LevelMode::Clustered)) },
                TickerAnalysis { ticker: "GONE".into(), outcome: Err(AnalysisError::NoData("GONE".into())) },
                TickerAnalysis { ticker: "HIGH".into(), outcome: Ok(sample("HIGH", 87.5, LevelMode::Clustered)) },
            ],
        }
    }

    #[test]
    fn batch_response_keeps_order_and_error_records() {
        let resp = BatchResponse::from(&outcome());
        let json = serde_json::to_value(&resp).unwrap();
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["ticker"], "LOW");
        assert_eq!(results[1], serde_json::json!({ "ticker": "GONE", "error": "No data found for GONE" }));
        assert_eq!(results[2]["score"], 87.5);
        assert!(json.get("batchId").is_some());
    }

    #[test]
    fn summary_sorts_by_score() {
        let text = Summary(&outcome()).to_string();
        let high = text.find("HIGH").unwrap();
        let low = text.find("LOW ").unwrap();
        assert!(high < low);
        assert!(text.contains("GONE   Error: No data found for GONE"));
    }

    #[test]
    fn text_report_prints_na_for_undefined() {
        let text = TextReport(&sample("TSLA", 50.0, LevelMode::Clustered)).to_string();
        assert!(text.contains("200-day SMA: $N/A"));
        assert!(text.contains("RSI (14):    28.12 (OVERSOLD)"));
        assert!(text.contains("Position: N/A%"));
        assert!(text.contains("Support 1: $121.25"));
        assert!(text.contains("Recommendation: MODERATE BUY"));
    }
}
