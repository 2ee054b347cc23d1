use serde::{Deserialize, Serialize};

use super::domain::VenueId;

/// Venue population before and after the capacity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityCounts {
    pub total: usize,
    pub pass_capacity: usize,
}

/// Scored row returned by the top-k query, one per surviving venue.
///
/// `matched_list` and `missing_list` partition the normalized requirement
/// set against the venue's amenities; `coverage` and `score` are rounded to
/// three decimals, matching the store-side aggregation contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVenue {
    pub venue: String,
    pub id: VenueId,
    pub capacity: u32,
    pub matched: usize,
    pub coverage: f64,
    pub slack: i64,
    pub score: f64,
    pub matched_list: Vec<String>,
    pub missing_list: Vec<String>,
}

/// Read-only query surface the matching pipeline issues against the graph.
///
/// Implementations may compute coverage and scores store-side (as the hosted
/// graph deployment does) or delegate to [`crate::matching::scoring`]; results
/// must be numerically identical either way.
pub trait VenueStore: Send + Sync {
    /// Total venue count and the count with `capacity >= attendees`.
    fn capacity_counts(&self, attendees: u32) -> Result<CapacityCounts, StoreError>;

    /// Count of venues passing both the capacity filter and `coverage >= min_coverage`.
    fn coverage_count(
        &self,
        attendees: u32,
        requirements: &[String],
        min_coverage: f64,
    ) -> Result<usize, StoreError>;

    /// Up to `k` scored venues passing both filters, in ranking order.
    fn scored_top_k(
        &self,
        attendees: u32,
        requirements: &[String],
        min_coverage: f64,
        k: usize,
    ) -> Result<Vec<ScoredVenue>, StoreError>;
}

/// Failures surfaced by a store backend. Never retried inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("venue store unavailable: {0}")]
    Unavailable(String),
    #[error("venue store query failed: {0}")]
    Query(String),
}
