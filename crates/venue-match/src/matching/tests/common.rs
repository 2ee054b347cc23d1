use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::graph::{
    Building, CapacityCounts, InMemoryVenueGraph, ScoredVenue, StoreError, VenueId, VenueRecord,
    VenueStore,
};
use crate::matching::{MatchRequest, MatchService};

pub(super) fn venue(
    id: &str,
    name: &str,
    building: &str,
    space_type: &str,
    capacity: u32,
    amenities: &[&str],
) -> VenueRecord {
    VenueRecord {
        id: VenueId(id.to_string()),
        name: name.to_string(),
        building: building.to_string(),
        space_type: space_type.to_string(),
        capacity,
        best_suited_for: String::new(),
        distance_from_main_campus: "5 min walk".to_string(),
        amenities: amenities
            .iter()
            .map(|amenity| amenity.to_string())
            .collect::<BTreeSet<String>>(),
    }
}

/// Six-venue campus fixture used across the pipeline tests.
pub(super) fn campus_store() -> InMemoryVenueGraph {
    let mut graph = InMemoryVenueGraph::new();

    graph.upsert_building(Building {
        name: "main building".to_string(),
        source_url: "https://campus.example/estates/main".to_string(),
        distance_from_main_campus: "on campus".to_string(),
    });
    graph.upsert_building(Building {
        name: "sports centre".to_string(),
        source_url: "https://campus.example/estates/sports".to_string(),
        distance_from_main_campus: "12 min walk".to_string(),
    });

    graph.upsert_venue(venue(
        "main building_great hall",
        "Great Hall",
        "main building",
        "hall",
        300,
        &[
            "stage",
            "sound system",
            "lighting",
            "seating area",
            "wi-fi",
            "accessibility",
        ],
    ));
    graph.upsert_venue(venue(
        "main building_lecture theatre a",
        "Lecture Theatre A",
        "main building",
        "lecture theatre",
        200,
        &[
            "projector",
            "projector screen",
            "wi-fi",
            "microphones",
            "chairs",
            "podium",
            "accessibility",
        ],
    ));
    graph.upsert_venue(venue(
        "main building_seminar room 2",
        "Seminar Room 2",
        "main building",
        "seminar room",
        40,
        &["whiteboard", "chairs", "desks", "wi-fi", "air conditioning"],
    ));
    graph.upsert_venue(venue(
        "main building_meeting room 1",
        "Meeting Room 1",
        "main building",
        "meeting room",
        12,
        &["chairs", "conference phone", "monitor", "whiteboard", "wi-fi"],
    ));
    graph.upsert_venue(venue(
        "science block_chemistry lab",
        "Chemistry Teaching Lab",
        "science block",
        "teaching lab",
        30,
        &["fume hood", "sinks", "safety signs", "eye wash stations"],
    ));
    graph.upsert_venue(venue(
        "sports centre_sports hall",
        "Sports Hall",
        "sports centre",
        "sports hall",
        450,
        &[
            "changing rooms",
            "scoreboard",
            "first aid kit",
            "basketball hoops",
        ],
    ));

    graph
}

pub(super) fn campus_service() -> MatchService<InMemoryVenueGraph> {
    MatchService::new(Arc::new(campus_store()))
}

pub(super) fn request(requirements: &[&str], attendees: u32) -> MatchRequest {
    MatchRequest::new(
        requirements
            .iter()
            .map(|requirement| requirement.to_string())
            .collect(),
        attendees,
    )
}

/// Store double simulating an unreachable graph backend.
pub(super) struct UnavailableStore;

impl VenueStore for UnavailableStore {
    fn capacity_counts(&self, _attendees: u32) -> Result<CapacityCounts, StoreError> {
        Err(StoreError::Unavailable("graph backend offline".to_string()))
    }

    fn coverage_count(
        &self,
        _attendees: u32,
        _requirements: &[String],
        _min_coverage: f64,
    ) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("graph backend offline".to_string()))
    }

    fn scored_top_k(
        &self,
        _attendees: u32,
        _requirements: &[String],
        _min_coverage: f64,
        _k: usize,
    ) -> Result<Vec<ScoredVenue>, StoreError> {
        Err(StoreError::Unavailable("graph backend offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
