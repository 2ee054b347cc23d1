use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::graph::ScoredVenue;

pub const SHORTLIST_MIN: usize = 1;
pub const SHORTLIST_MAX: usize = 5;

/// Tunable numeric policy behind the composite suitability score.
///
/// The score keeps two separate coverage terms because the production scoring
/// query ships this exact formula; folding them into one weight changes
/// nothing numerically but breaks parity with the audited formula text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingPolicy {
    pub coverage_weight: f64,
    pub coverage_bonus_weight: f64,
    pub slack_penalty_weight: f64,
    pub slack_steepness: f64,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            coverage_weight: 0.65,
            coverage_bonus_weight: 0.15,
            slack_penalty_weight: 0.20,
            slack_steepness: 0.15,
        }
    }
}

impl RankingPolicy {
    /// Logistic squash of capacity surplus: tight fits cost almost nothing,
    /// oversized venues approach the full penalty weight.
    pub fn slack_penalty(&self, slack: i64) -> f64 {
        1.0 / (1.0 + (-self.slack_steepness * slack as f64).exp())
    }

    pub fn composite_score(&self, coverage: f64, slack: i64) -> f64 {
        self.coverage_weight * coverage + self.coverage_bonus_weight * coverage
            - self.slack_penalty_weight * self.slack_penalty(slack)
    }

    /// Human-readable restatement of the formula used in explanation output.
    pub fn formula_label(&self) -> String {
        format!(
            "Score = {:.2}*Coverage + {:.2}*Coverage - {:.2}*SlackPenalty",
            self.coverage_weight, self.coverage_bonus_weight, self.slack_penalty_weight
        )
    }
}

/// Fraction of requested amenities present at a venue; vacuously 1.0 when
/// nothing was requested.
pub fn coverage(matched: usize, required: usize) -> f64 {
    if required == 0 {
        1.0
    } else {
        matched as f64 / required as f64
    }
}

/// Rounding applied to coverage and score values in output rows.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Clamp the caller-supplied shortlist size to the supported range.
pub fn clamp_shortlist(k: usize) -> usize {
    k.clamp(SHORTLIST_MIN, SHORTLIST_MAX)
}

/// Total order over scored rows: score descending, then slack ascending
/// (tighter capacity fit first), then capacity ascending.
pub fn rank_order(a: &ScoredVenue, b: &ScoredVenue) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.slack.cmp(&b.slack))
        .then(a.capacity.cmp(&b.capacity))
}
