use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Stable unique key for a venue, distinct from its display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VenueId(pub String);

impl VenueId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Building owning one or more venues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub source_url: String,
    pub distance_from_main_campus: String,
}

/// A bookable space together with its amenity set.
///
/// Amenity names are case-normalized on insert so that requirement matching
/// is a plain set lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: VenueId,
    pub name: String,
    pub building: String,
    pub space_type: String,
    pub capacity: u32,
    pub best_suited_for: String,
    pub distance_from_main_campus: String,
    pub amenities: BTreeSet<String>,
}

impl VenueRecord {
    pub fn has_amenity(&self, name: &str) -> bool {
        self.amenities.contains(name)
    }
}

/// Canonical amenity form used on both sides of a comparison.
pub fn normalize_amenity(raw: &str) -> String {
    raw.trim().to_lowercase()
}
