use std::collections::BTreeMap;

use super::domain::{normalize_amenity, Building, VenueId, VenueRecord};
use super::store::{CapacityCounts, ScoredVenue, StoreError, VenueStore};
use crate::matching::scoring::{self, RankingPolicy};

/// Reference [`VenueStore`] holding the whole graph in process memory.
///
/// Upserts follow the ingestion semantics of the hosted graph: buildings and
/// venues are keyed by name / canonical name and the last write wins. Scoring
/// delegates to [`crate::matching::scoring`] so that ranks are identical to a
/// store-side computation.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVenueGraph {
    buildings: BTreeMap<String, Building>,
    venues: BTreeMap<VenueId, VenueRecord>,
    policy: RankingPolicy,
}

impl InMemoryVenueGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RankingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    pub fn upsert_building(&mut self, building: Building) {
        self.buildings.insert(building.name.clone(), building);
    }

    /// Insert or replace a venue, case-normalizing its amenity set.
    pub fn upsert_venue(&mut self, mut venue: VenueRecord) {
        venue.amenities = venue
            .amenities
            .iter()
            .map(|amenity| normalize_amenity(amenity))
            .collect();
        self.venues.insert(venue.id.clone(), venue);
    }

    pub fn venue(&self, id: &VenueId) -> Option<&VenueRecord> {
        self.venues.get(id)
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    fn capacity_survivors(&self, attendees: u32) -> impl Iterator<Item = &VenueRecord> {
        self.venues
            .values()
            .filter(move |venue| venue.capacity >= attendees)
    }

    fn score_row(&self, venue: &VenueRecord, attendees: u32, requirements: &[String]) -> ScoredVenue {
        let matched_list: Vec<String> = requirements
            .iter()
            .filter(|requirement| venue.has_amenity(requirement))
            .cloned()
            .collect();
        let missing_list: Vec<String> = requirements
            .iter()
            .filter(|requirement| !venue.has_amenity(requirement))
            .cloned()
            .collect();

        let coverage = scoring::coverage(matched_list.len(), requirements.len());
        let slack = i64::from(venue.capacity) - i64::from(attendees);
        let score = self.policy.composite_score(coverage, slack);

        ScoredVenue {
            venue: venue.name.clone(),
            id: venue.id.clone(),
            capacity: venue.capacity,
            matched: matched_list.len(),
            coverage: scoring::round3(coverage),
            slack,
            score: scoring::round3(score),
            matched_list,
            missing_list,
        }
    }
}

impl VenueStore for InMemoryVenueGraph {
    fn capacity_counts(&self, attendees: u32) -> Result<CapacityCounts, StoreError> {
        Ok(CapacityCounts {
            total: self.venues.len(),
            pass_capacity: self.capacity_survivors(attendees).count(),
        })
    }

    fn coverage_count(
        &self,
        attendees: u32,
        requirements: &[String],
        min_coverage: f64,
    ) -> Result<usize, StoreError> {
        let count = self
            .capacity_survivors(attendees)
            .filter(|venue| {
                let matched = requirements
                    .iter()
                    .filter(|requirement| venue.has_amenity(requirement))
                    .count();
                scoring::coverage(matched, requirements.len()) >= min_coverage
            })
            .count();
        Ok(count)
    }

    fn scored_top_k(
        &self,
        attendees: u32,
        requirements: &[String],
        min_coverage: f64,
        k: usize,
    ) -> Result<Vec<ScoredVenue>, StoreError> {
        let mut rows: Vec<ScoredVenue> = self
            .capacity_survivors(attendees)
            .map(|venue| self.score_row(venue, attendees, requirements))
            .filter(|row| scoring::coverage(row.matched, requirements.len()) >= min_coverage)
            .collect();

        rows.sort_by(scoring::rank_order);
        rows.truncate(k);
        Ok(rows)
    }
}
