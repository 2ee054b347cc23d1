use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use venue_match::error::AppError;
use venue_match::graph::{load_jsonl, Building, InMemoryVenueGraph, VenueId, VenueRecord};
use venue_match::intent::defaults::AmenityDefaults;
use venue_match::intent::{IntentModel, ModelError, AMENITY_VOCABULARY};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the venue graph from a JSON-lines dataset, or fall back to the
/// built-in demo campus when no dataset is configured.
pub(crate) fn load_graph(dataset: Option<&Path>) -> Result<InMemoryVenueGraph, AppError> {
    let defaults = AmenityDefaults::standard();
    match dataset {
        Some(path) => Ok(load_jsonl(path, Some(&defaults))?),
        None => Ok(demo_campus_graph(&defaults)),
    }
}

fn demo_venue(
    building: &str,
    name: &str,
    space_type: &str,
    capacity: u32,
    best_suited_for: &str,
    amenities: &[&str],
    defaults: &AmenityDefaults,
) -> VenueRecord {
    let mut amenity_set: BTreeSet<String> = amenities
        .iter()
        .map(|amenity| amenity.to_string())
        .collect();
    defaults.apply(space_type, &mut amenity_set);

    VenueRecord {
        id: VenueId(format!("{building}_{}", name.to_lowercase())),
        name: name.to_string(),
        building: building.to_string(),
        space_type: space_type.to_string(),
        capacity,
        best_suited_for: best_suited_for.to_string(),
        distance_from_main_campus: String::new(),
        amenities: amenity_set,
    }
}

/// Seven-venue campus used by the demo and by `serve` when APP_DATASET is
/// unset.
pub(crate) fn demo_campus_graph(defaults: &AmenityDefaults) -> InMemoryVenueGraph {
    let mut graph = InMemoryVenueGraph::new();

    graph.upsert_building(Building {
        name: "main building".to_string(),
        source_url: "https://estates.example.edu/main-building".to_string(),
        distance_from_main_campus: "on campus".to_string(),
    });
    graph.upsert_building(Building {
        name: "science block".to_string(),
        source_url: "https://estates.example.edu/science-block".to_string(),
        distance_from_main_campus: "4 min walk".to_string(),
    });
    graph.upsert_building(Building {
        name: "sports centre".to_string(),
        source_url: "https://estates.example.edu/sports-centre".to_string(),
        distance_from_main_campus: "12 min walk".to_string(),
    });

    graph.upsert_venue(demo_venue(
        "main building",
        "Great Hall",
        "hall",
        300,
        "ceremonies, concerts, large receptions",
        &["wi-fi", "catering facilities", "accessibility"],
        defaults,
    ));
    graph.upsert_venue(demo_venue(
        "main building",
        "Lecture Theatre A",
        "lecture theatre",
        200,
        "lectures, conferences, screenings",
        &["projector", "wi-fi", "accessibility", "induction loop"],
        defaults,
    ));
    graph.upsert_venue(demo_venue(
        "main building",
        "Seminar Room 2",
        "seminar room",
        40,
        "seminars, workshops, tutorials",
        &["wi-fi", "projector"],
        defaults,
    ));
    graph.upsert_venue(demo_venue(
        "main building",
        "Meeting Room 1",
        "meeting room",
        12,
        "committee meetings, interviews",
        &["wi-fi"],
        defaults,
    ));
    graph.upsert_venue(demo_venue(
        "science block",
        "Chemistry Teaching Lab",
        "teaching lab",
        30,
        "practical classes, outreach demos",
        &["fume hood", "gas taps", "eye wash stations"],
        defaults,
    ));
    graph.upsert_venue(demo_venue(
        "sports centre",
        "Dance Studio",
        "studio",
        25,
        "dance classes, rehearsals, fitness sessions",
        &["sprung floor", "barres", "sound system"],
        defaults,
    ));
    graph.upsert_venue(demo_venue(
        "sports centre",
        "Sports Hall",
        "sports hall",
        450,
        "indoor sports, exams, large fairs",
        &["basketball hoops", "badminton nets", "wi-fi"],
        defaults,
    ));

    graph
}

const EVENT_TYPES: &[&str] = &[
    "conference",
    "lecture",
    "tournament",
    "rehearsal",
    "workshop",
    "seminar",
    "exhibition",
    "concert",
    "ceremony",
    "meeting",
];

/// Offline stand-in for a hosted text-generation backend.
///
/// Answers the extraction prompt by keyword-scanning the query against the
/// amenity vocabulary, and the enrichment prompt with a fixed constraint
/// bundle. Good enough for the CLI and demos; a deployment wires a real
/// model behind [`IntentModel`] instead.
pub(crate) struct KeywordIntentModel;

impl IntentModel for KeywordIntentModel {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ModelError> {
        if system_prompt.is_empty() {
            // Enrichment call.
            return Ok(json!([
                "step-free access to the room",
                "clearly signed evacuation routes",
                "parking available nearby"
            ])
            .to_string());
        }

        let query = user_prompt.strip_prefix("Query: ").unwrap_or(user_prompt);
        Ok(extraction_payload(query).to_string())
    }
}

fn extraction_payload(query: &str) -> Value {
    let lowered = query.to_lowercase();

    let attendees = lowered
        .split(|c: char| !c.is_ascii_digit())
        .find(|token| !token.is_empty())
        .and_then(|token| token.parse::<u32>().ok());

    let event_type = EVENT_TYPES
        .iter()
        .find(|event_type| lowered.contains(**event_type))
        .map(|event_type| event_type.to_string());

    let organizer = ["needs", "wants", "requires", "is looking"]
        .iter()
        .filter_map(|verb| lowered.find(verb))
        .min()
        .and_then(|position| query.get(..position))
        .map(|prefix| prefix.trim().trim_end_matches(',').to_string())
        .filter(|organizer| !organizer.is_empty());

    let mut requirements: Vec<String> = AMENITY_VOCABULARY
        .iter()
        .filter(|amenity| lowered.contains(**amenity))
        .map(|amenity| amenity.to_string())
        .collect();
    if !requirements.iter().any(|amenity| amenity == "accessibility") {
        requirements.push("accessibility".to_string());
    }

    let mut constraints = Vec::new();
    if lowered.contains("evening") {
        constraints.push("evening availability".to_string());
    }
    if lowered.contains("quiet") {
        constraints.push("quiet environment".to_string());
    }
    if lowered.contains("catering") {
        constraints.push("space for external catering".to_string());
    }

    json!({
        "organizer": organizer,
        "event_type": event_type,
        "attendees": attendees,
        "requirements": requirements,
        "constraints": constraints,
    })
}
