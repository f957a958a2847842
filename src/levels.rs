// =============================================================================
// Support / Resistance Level Detector
// =============================================================================
//
// Two strategies selected by `LevelMode`:
//
//   Clustered      Local extrema over the last 60 bars. A bar is a resistance
//                  candidate when its close strictly exceeds the two closes on
//                  each side and its volume exceeds 0.8x the window average;
//                  support is the strict-minimum mirror. Candidates of the
//                  same kind within 2% are merged, ranked by merge count, and
//                  the top two of each kind are kept.
//
//   VolumeProfile  The ten highest-volume bars of the whole series, split
//                  around the current price into at most one support (the
//                  highest below) and one resistance (the lowest above).
//
// The merge tolerance is measured relative to the *incoming* candidate's price
// and the first matching cluster in creation order absorbs it. Merging sets
// the cluster price to the mean of the old cluster price and the candidate,
// so later candidates weigh more than earlier ones.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::LevelMode;

const CLUSTER_LOOKBACK: usize = 60;
const EXTREMUM_RADIUS: usize = 2;
const VOLUME_FILTER: f64 = 0.8;
const MERGE_TOLERANCE: f64 = 0.02;
const LEVELS_PER_KIND: usize = 2;
const PROFILE_BARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Support,
    Resistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub price: f64,
    pub kind: LevelKind,
    /// Number of raw extrema merged into this level.
    pub count: u32,
}

/// Detected levels, each list ordered by significance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub mode: LevelMode,
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
}

impl LevelSet {
    pub fn empty(mode: LevelMode) -> Self {
        Self {
            mode,
            support: Vec::new(),
            resistance: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }

    /// Any support level within 2% of `price` (distance relative to price).
    pub fn near_support(&self, price: f64) -> bool {
        self.support.iter().any(|l| is_near(price, l.price))
    }

    /// Any resistance level within 2% of `price` (distance relative to price).
    pub fn near_resistance(&self, price: f64) -> bool {
        self.resistance.iter().any(|l| is_near(price, l.price))
    }
}

fn is_near(price: f64, level: f64) -> bool {
    (price - level).abs() / price < MERGE_TOLERANCE
}

/// Run the configured detection strategy over aligned close/volume series.
pub fn detect_levels(closes: &[f64], volumes: &[f64], mode: LevelMode) -> LevelSet {
    match mode {
        LevelMode::Clustered => clustered_levels(closes, volumes),
        LevelMode::VolumeProfile => volume_profile_levels(closes, volumes),
    }
}

// =============================================================================
// Clustered extrema
// =============================================================================

fn clustered_levels(closes: &[f64], volumes: &[f64]) -> LevelSet {
    let len = closes.len().min(volumes.len());
    let lookback = len.min(CLUSTER_LOOKBACK);
    let prices = &closes[len - lookback..len];
    let vols = &volumes[len - lookback..len];

    if prices.is_empty() {
        return LevelSet::empty(LevelMode::Clustered);
    }

    let avg_vol = vols.iter().sum::<f64>() / vols.len() as f64;
    let min_volume = avg_vol * VOLUME_FILTER;

    let mut candidates = Vec::new();
    for i in EXTREMUM_RADIUS..prices.len().saturating_sub(EXTREMUM_RADIUS) {
        let price = prices[i];
        if vols[i] <= min_volume {
            continue;
        }
        let neighbours = [prices[i - 2], prices[i - 1], prices[i + 1], prices[i + 2]];

        if neighbours.iter().all(|&n| price > n) {
            candidates.push(Level {
                price,
                kind: LevelKind::Resistance,
                count: 1,
            });
        }
        if neighbours.iter().all(|&n| price < n) {
            candidates.push(Level {
                price,
                kind: LevelKind::Support,
                count: 1,
            });
        }
    }

    let mut clusters = cluster_levels(candidates);
    // Stable: equal counts keep discovery order.
    clusters.sort_by(|a, b| b.count.cmp(&a.count));

    let top = |kind: LevelKind| -> Vec<Level> {
        clusters
            .iter()
            .filter(|l| l.kind == kind)
            .take(LEVELS_PER_KIND)
            .cloned()
            .collect()
    };

    LevelSet {
        mode: LevelMode::Clustered,
        support: top(LevelKind::Support),
        resistance: top(LevelKind::Resistance),
    }
}

/// Merge raw candidates of the same kind that lie within 2% of each other.
pub fn cluster_levels(candidates: Vec<Level>) -> Vec<Level> {
    let mut clusters: Vec<Level> = Vec::new();

    for candidate in candidates {
        let existing = clusters.iter_mut().find(|c| {
            c.kind == candidate.kind
                && (c.price - candidate.price).abs() / candidate.price < MERGE_TOLERANCE
        });

        match existing {
            Some(cluster) => {
                cluster.count += 1;
                cluster.price = (cluster.price + candidate.price) / 2.0;
            }
            None => clusters.push(Level {
                count: 1,
                ..candidate
            }),
        }
    }

    clusters
}

// =============================================================================
// Volume profile
// =============================================================================

fn volume_profile_levels(closes: &[f64], volumes: &[f64]) -> LevelSet {
    let Some(&current) = closes.last() else {
        return LevelSet::empty(LevelMode::VolumeProfile);
    };

    let mut bars: Vec<(f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &price)| (price, volumes.get(i).copied().unwrap_or(0.0)))
        .collect();

    // Stable sorts throughout so ties resolve by position.
    bars.sort_by(|a, b| b.1.total_cmp(&a.1));
    bars.truncate(PROFILE_BARS);
    bars.sort_by(|a, b| a.0.total_cmp(&b.0));

    let support = bars
        .iter()
        .filter(|(price, _)| *price < current)
        .last()
        .map(|&(price, _)| Level {
            price,
            kind: LevelKind::Support,
            count: 1,
        });
    let resistance = bars
        .iter()
        .find(|(price, _)| *price > current)
        .map(|&(price, _)| Level {
            price,
            kind: LevelKind::Resistance,
            count: 1,
        });

    LevelSet {
        mode: LevelMode::VolumeProfile,
        support: support.into_iter().collect(),
        resistance: resistance.into_iter().collect(),
    }
}
