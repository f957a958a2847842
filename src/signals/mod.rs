// =============================================================================
// Signals Module
// =============================================================================
//
// Turns the latest-index indicator snapshot plus detected levels into a
// score, a recommendation and an ordered list of explanatory tags:
// - Detailed profile (eight equally weighted factors, 0–100)
// - Lightweight profile (unbounded weighted sum)

pub mod detailed;
pub mod lightweight;
pub mod snapshot;
pub mod weighted_score;

pub use snapshot::IndicatorSnapshot;
pub use weighted_score::{score, ScoringResult, SignalContribution};
