// =============================================================================
// Weighted Scorer — profile-selected signal aggregation
// =============================================================================
//
// Each profile walks its rules top to bottom and records every rule that
// fired as a `SignalContribution`. The first matching branch of a factor
// wins. Tags are appended in discovery order and only for rules that carry
// one.

use serde::{Deserialize, Serialize};

use crate::levels::LevelSet;
use crate::signals::snapshot::IndicatorSnapshot;
use crate::signals::{detailed, lightweight};
use crate::types::{Recommendation, ScoringProfile};

/// The contribution of a single rule to the final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalContribution {
    pub factor: String,
    pub points: f64,
}

/// Result of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub profile: ScoringProfile,
    pub score: f64,
    pub recommendation: Recommendation,
    pub tags: Vec<String>,
    pub contributions: Vec<SignalContribution>,
}

/// Accumulates rule outcomes while a profile evaluates.
#[derive(Debug, Default)]
pub struct ScoreCard {
    total: f64,
    tags: Vec<String>,
    contributions: Vec<SignalContribution>,
}

impl ScoreCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fired rule.
    pub fn award(&mut self, factor: &str, points: f64, tag: Option<&str>) {
        self.total += points;
        self.contributions.push(SignalContribution {
            factor: factor.to_string(),
            points,
        });
        if let Some(tag) = tag {
            self.tags.push(tag.to_string());
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Close the card with a final score derived from the accumulated total.
    pub fn finish(self, profile: ScoringProfile, score: f64) -> ScoringResult {
        ScoringResult {
            profile,
            score,
            recommendation: Recommendation::from_score(score),
            tags: self.tags,
            contributions: self.contributions,
        }
    }
}

/// Score a snapshot under the given profile.
pub fn score(profile: ScoringProfile, snapshot: &IndicatorSnapshot, levels: &LevelSet) -> ScoringResult {
    match profile {
        ScoringProfile::Detailed => detailed::score(snapshot, levels),
        ScoringProfile::Lightweight => lightweight::score(snapshot, levels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_accumulates_points_tags_and_contributions() {
        let mut card = ScoreCard::new();
        card.award("rsi", 1.0, Some("RSI Oversold"));
        card.award("ma_short", 0.5, None);
        assert_eq!(card.total(), 1.5);

        let result = card.finish(ScoringProfile::Detailed, 80.0);
        assert_eq!(result.tags, vec!["RSI Oversold"]);
        assert_eq!(result.contributions.len(), 2);
        assert_eq!(result.contributions[1].factor, "ma_short");
        assert_eq!(result.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn empty_card_is_avoid() {
        let result = ScoreCard::new().finish(ScoringProfile::Lightweight, 0.0);
        assert!(result.tags.is_empty());
        assert_eq!(result.recommendation, Recommendation::Avoid);
    }
}
