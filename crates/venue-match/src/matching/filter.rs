use serde::{Deserialize, Serialize};

use crate::graph::{StoreError, VenueStore};

/// Venue population at each narrowing stage, reported for explainability.
///
/// Invariant: `pass_coverage <= pass_capacity <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCounts {
    pub total: usize,
    pub pass_capacity: usize,
    pub pass_coverage: usize,
}

/// Run the two count queries backing the filter stages.
pub(crate) fn stage_counts<S: VenueStore + ?Sized>(
    store: &S,
    attendees: u32,
    requirements: &[String],
    min_coverage: f64,
) -> Result<FilterCounts, StoreError> {
    let capacity = store.capacity_counts(attendees)?;
    let pass_coverage = store.coverage_count(attendees, requirements, min_coverage)?;

    Ok(FilterCounts {
        total: capacity.total,
        pass_capacity: capacity.pass_capacity,
        pass_coverage,
    })
}
