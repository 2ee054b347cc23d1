use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::explain::{build_reasoning_path, ReasoningPath};
use super::filter;
use super::scoring::{self, RankingPolicy};
use crate::graph::{normalize_amenity, ScoredVenue, StoreError, VenueStore};

/// Coverage threshold used when the caller does not supply one. The same
/// value feeds both the reporting count and the ranking filter.
pub const DEFAULT_MIN_COVERAGE: f64 = 0.6;

fn default_min_coverage() -> f64 {
    DEFAULT_MIN_COVERAGE
}

fn default_shortlist() -> usize {
    1
}

/// One ranking request: the structured output of intent extraction plus
/// tuning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub requirements: Vec<String>,
    pub attendees: u32,
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,
    #[serde(default = "default_shortlist")]
    pub shortlist: usize,
}

impl MatchRequest {
    pub fn new(requirements: Vec<String>, attendees: u32) -> Self {
        Self {
            requirements,
            attendees,
            min_coverage: DEFAULT_MIN_COVERAGE,
            shortlist: 1,
        }
    }
}

/// Ranked shortlist plus the explanation tree, returned together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub ranked: Vec<ScoredVenue>,
    pub explanation: ReasoningPath,
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("attendee count must be positive (got {0})")]
    InvalidAttendees(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Trim, lowercase, and deduplicate requirement strings, preserving first
/// occurrence order. Entries that are empty after trimming are dropped.
pub fn normalize_requirements(raw: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(raw.len());
    for entry in raw {
        let requirement = normalize_amenity(entry);
        if requirement.is_empty() || normalized.contains(&requirement) {
            continue;
        }
        normalized.push(requirement);
    }
    normalized
}

/// Query orchestrator composing the store queries, filters, scoring, and
/// explanation builder into one synchronous call. Holds no mutable state;
/// safe to share across concurrent callers.
pub struct MatchService<S> {
    store: Arc<S>,
    policy: RankingPolicy,
}

impl<S: VenueStore> MatchService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, RankingPolicy::default())
    }

    /// The policy here only feeds the explanation's formula label; the store
    /// must be configured with the same policy for the scores to agree.
    pub fn with_policy(store: Arc<S>, policy: RankingPolicy) -> Self {
        Self { store, policy }
    }

    pub fn rank(&self, request: &MatchRequest) -> Result<MatchOutcome, MatchError> {
        if request.attendees == 0 {
            return Err(MatchError::InvalidAttendees(i64::from(request.attendees)));
        }

        let requirements = normalize_requirements(&request.requirements);
        let shortlist = scoring::clamp_shortlist(request.shortlist);

        let counts = filter::stage_counts(
            self.store.as_ref(),
            request.attendees,
            &requirements,
            request.min_coverage,
        )?;
        let ranked = self.store.scored_top_k(
            request.attendees,
            &requirements,
            request.min_coverage,
            shortlist,
        )?;

        debug!(
            attendees = request.attendees,
            total = counts.total,
            pass_capacity = counts.pass_capacity,
            pass_coverage = counts.pass_coverage,
            shortlisted = ranked.len(),
            "venue ranking complete"
        );

        let explanation = build_reasoning_path(
            request.attendees,
            request.min_coverage,
            &requirements,
            &counts,
            &ranked,
            &self.policy.formula_label(),
        );

        Ok(MatchOutcome {
            ranked,
            explanation,
        })
    }
}
