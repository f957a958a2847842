// =============================================================================
// Detailed Profile — eight equally weighted factors
// =============================================================================
//
// Each factor awards 1.0 (full), 0.5 (half) or nothing. The score is the
// credit total over 8, as a percentage.
//
//   Factor     Full                              Half
//   RSI        < 30                              < 40
//   MACD       fresh bullish crossover           MACD above signal
//   Short MA   price > SMA20 > SMA50             not price < SMA20 < SMA50
//   Long MA    price > SMA200                    -
//   Bollinger  position < 20                     < 40, or <= 60
//   Volume     ratio > 1.2                       > 0.8
//   52-week    > 20% below high                  > 10% below high
//   S/R        within 2% of a support            not within 2% of a resistance
// =============================================================================

use crate::levels::LevelSet;
use crate::signals::snapshot::{gt, le, lt, IndicatorSnapshot};
use crate::signals::weighted_score::{ScoreCard, ScoringResult};
use crate::types::ScoringProfile;

const FACTOR_COUNT: f64 = 8.0;

const FULL: f64 = 1.0;
const HALF: f64 = 0.5;

/// Convert a credit total into a 0–100 score.
pub fn normalise(credits: f64) -> f64 {
    credits / FACTOR_COUNT * 100.0
}

pub fn score(s: &IndicatorSnapshot, levels: &LevelSet) -> ScoringResult {
    let mut card = ScoreCard::new();
    let price = Some(s.price);

    // RSI
    if lt(s.rsi, Some(30.0)) {
        card.award("rsi", FULL, Some("RSI Oversold"));
    } else if lt(s.rsi, Some(40.0)) {
        card.award("rsi", HALF, Some("RSI Low"));
    }

    // MACD
    if gt(s.macd, s.macd_signal) && le(s.prev_macd, s.prev_macd_signal) {
        card.award("macd", FULL, Some("MACD Bullish Crossover"));
    } else if gt(s.macd, s.macd_signal) {
        card.award("macd", HALF, Some("MACD Bullish"));
    }

    // Short-term moving averages
    if gt(price, s.sma_short) && gt(s.sma_short, s.sma_medium) {
        card.award("ma_short", FULL, Some("Strong Uptrend"));
    } else if !(lt(price, s.sma_short) && lt(s.sma_short, s.sma_medium)) {
        card.award("ma_short", HALF, None);
    }

    // Long-term moving average
    if gt(price, s.sma_long) {
        card.award("ma_long", FULL, Some("Long-term Uptrend"));
    }

    // Bollinger position
    if lt(s.bb_position, Some(20.0)) {
        card.award("bollinger", FULL, Some("Near Lower BB"));
    } else if lt(s.bb_position, Some(40.0)) || le(s.bb_position, Some(60.0)) {
        card.award("bollinger", HALF, None);
    }

    // Volume
    if gt(s.volume_ratio, Some(1.2)) {
        card.award("volume", FULL, Some("High Volume"));
    } else if gt(s.volume_ratio, Some(0.8)) {
        card.award("volume", HALF, None);
    }

    // 52-week position
    if gt(s.distance_from_high, Some(20.0)) {
        card.award("week52", FULL, Some("Far from High"));
    } else if gt(s.distance_from_high, Some(10.0)) {
        card.award("week52", HALF, None);
    }

    // Support / resistance
    if levels.near_support(s.price) {
        card.award("levels", FULL, Some("Near Support"));
    } else if !levels.near_resistance(s.price) {
        card.award("levels", HALF, None);
    }

    let score = normalise(card.total());
    card.finish(ScoringProfile::Detailed, score)
}
