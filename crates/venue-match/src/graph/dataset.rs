use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{Building, VenueId, VenueRecord};
use super::memory::InMemoryVenueGraph;
use crate::intent::defaults::AmenityDefaults;

/// One JSON-lines record: a scraped building page with its nested venues.
#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(default)]
    url: String,
    data: DatasetBuilding,
}

#[derive(Debug, Deserialize)]
struct DatasetBuilding {
    building_name: String,
    #[serde(default)]
    distance_from_main_campus: String,
    #[serde(default)]
    venues: Vec<DatasetVenue>,
}

#[derive(Debug, Deserialize)]
struct DatasetVenue {
    canonical_name: String,
    name: String,
    #[serde(default)]
    space_type: String,
    #[serde(default, deserialize_with = "capacity_field")]
    capacity: u32,
    #[serde(default)]
    best_suited_for: String,
    #[serde(default)]
    distance_from_main_campus: String,
    #[serde(default)]
    amenities: Vec<String>,
}

// Scraped records carry capacity either as a number or as a quoted string;
// unparseable values fall back to 0, like the ingestion script's toInteger.
fn capacity_field<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCapacity {
        Number(u32),
        Text(String),
    }

    Ok(match RawCapacity::deserialize(deserializer)? {
        RawCapacity::Number(value) => value,
        RawCapacity::Text(value) => value.trim().parse().unwrap_or(0),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset record on line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
}

/// Load a JSON-lines venue dataset from disk into a fresh in-memory graph.
pub fn load_jsonl(
    path: &Path,
    defaults: Option<&AmenityDefaults>,
) -> Result<InMemoryVenueGraph, DatasetError> {
    let file = File::open(path)?;
    read_jsonl(BufReader::new(file), defaults)
}

/// Read JSON-lines venue records, optionally applying the space-type amenity
/// defaults to each venue before insert. Blank lines are skipped.
pub fn read_jsonl<R: BufRead>(
    reader: R,
    defaults: Option<&AmenityDefaults>,
) -> Result<InMemoryVenueGraph, DatasetError> {
    let mut graph = InMemoryVenueGraph::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record: DatasetRecord = serde_json::from_str(&line).map_err(|source| {
            DatasetError::Parse {
                line: index + 1,
                source,
            }
        })?;

        graph.upsert_building(Building {
            name: record.data.building_name.clone(),
            source_url: record.url,
            distance_from_main_campus: record.data.distance_from_main_campus,
        });

        for venue in record.data.venues {
            let mut amenities: std::collections::BTreeSet<String> =
                venue.amenities.into_iter().collect();
            if let Some(defaults) = defaults {
                defaults.apply(&venue.space_type, &mut amenities);
            }

            graph.upsert_venue(VenueRecord {
                id: VenueId(venue.canonical_name),
                name: venue.name,
                building: record.data.building_name.clone(),
                space_type: venue.space_type,
                capacity: venue.capacity,
                best_suited_for: venue.best_suited_for,
                distance_from_main_campus: venue.distance_from_main_campus,
                amenities,
            });
        }
    }

    Ok(graph)
}
