// =============================================================================
// Lightweight Profile — unbounded weighted sum
// =============================================================================
//
// The raw sum is the score; it is not clamped to [0, 100] and can go
// negative. Only the recommendation bands give it meaning.

use crate::levels::LevelSet;
use crate::signals::snapshot::{gt, lt, IndicatorSnapshot};
use crate::signals::weighted_score::{ScoreCard, ScoringResult};
use crate::types::ScoringProfile;

const SUPPORT_PROXIMITY: f64 = 1.02;

pub fn score(s: &IndicatorSnapshot, levels: &LevelSet) -> ScoringResult {
    let mut card = ScoreCard::new();
    let price = Some(s.price);

    if lt(s.rsi, Some(30.0)) {
        card.award("rsi", 25.0, Some("RSI Oversold"));
    } else if gt(s.rsi, Some(70.0)) {
        card.award("rsi", -15.0, Some("RSI Overbought"));
    }

    if gt(s.macd, Some(0.0)) {
        card.award("macd", 20.0, Some("Positive MACD"));
    }

    if gt(price, s.sma_short) && gt(price, s.sma_medium) {
        card.award("ma_short", 20.0, Some("Above Short-term MAs"));
    }

    if gt(s.sma_short, s.sma_medium) && gt(s.sma_medium, s.sma_long) {
        card.award("ma_long", 15.0, Some("Long-term Uptrend"));
    }

    if gt(s.volume_ratio, Some(1.2)) {
        card.award("volume", 10.0, Some("High Volume"));
    }

    if lt(s.bb_position, Some(20.0)) {
        card.award("bollinger", 15.0, Some("Near Lower BB"));
    } else if gt(s.bb_position, Some(80.0)) {
        card.award("bollinger", -10.0, None);
    }

    if let Some(support) = levels.support.first() {
        if s.price <= support.price * SUPPORT_PROXIMITY {
            card.award("levels", 10.0, Some("Near Support"));
        }
    }

    if gt(s.distance_from_low, Some(5.0)) && gt(s.distance_from_high, Some(30.0)) {
        card.award("week52", 10.0, Some("Recovery Potential"));
    }

    let score = card.total();
    card.finish(ScoringProfile::Lightweight, score)
}
