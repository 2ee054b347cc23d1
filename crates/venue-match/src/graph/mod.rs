//! Venue property graph: domain records, the read-only store contract, an
//! in-memory reference store, and the JSON-lines dataset loader.

pub mod dataset;
pub mod domain;
pub mod memory;
pub mod store;

pub use dataset::{load_jsonl, read_jsonl, DatasetError};
pub use domain::{normalize_amenity, Building, VenueId, VenueRecord};
pub use memory::InMemoryVenueGraph;
pub use store::{CapacityCounts, ScoredVenue, StoreError, VenueStore};
