use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::model::{strip_code_fence, IntentModel, RawExtraction};

/// Amenity names the extraction prompt is allowed to emit. Mirrors the
/// canonical amenity nodes in the venue graph.
pub const AMENITY_VOCABULARY: &[&str] = &[
    "microphones",
    "conference table",
    "wi-fi",
    "tables",
    "chairs",
    "power outlets",
    "catering area",
    "conference phone",
    "goal posts",
    "floodlights",
    "goals",
    "stage area",
    "lighting",
    "security",
    "rotary evaporators",
    "spectrophotometer",
    "incubators",
    "microscopes",
    "autoclave",
    "laminar flow hood",
    "balances",
    "ph meters",
    "magnetic stirrers",
    "stage",
    "sound system",
    "catering facilities",
    "sprung floor",
    "barres",
    "easels",
    "pottery wheels",
    "kiln",
    "ventilation system",
    "starting blocks",
    "lane ropes",
    "shallow water",
    "warm water",
    "av/projector",
    "accessibility",
    "audio-visual facilities",
    "induction loop",
    "fume hoods",
    "eye wash stations",
    "chemical storage",
    "gas taps",
    "distilled water",
    "large fume hood",
    "projector",
    "whiteboard",
    "demonstration bench",
    "pa system",
    "chemical storage cabinets",
    "fume hood",
    "balance",
    "nitrogen gas",
    "spectrometer",
    "chromatograph",
    "computer workstations",
    "badminton nets",
    "basketball hoops",
    "volleyball nets",
    "scoreboard",
    "changing rooms",
    "mats",
    "mirrors",
    "training equipment",
    "first aid kit",
    "showers",
    "lockers",
    "toilets",
    "benches",
    "desks",
    "podium",
    "air conditioning",
    "projector screen",
    "monitor",
    "seating area",
    "sinks",
    "safety signs",
    "ventilation",
    "lifeguard chair",
    "water filtration system",
    "decorative plants",
];

fn extraction_system_prompt() -> String {
    format!(
        "You are an expert event coordinator specializing in matching events to \
         appropriate venues.\n\
         Analyze an event booking query and extract ONLY information relevant to \
         the venue side.\n\n\
         Return JSON in this exact format:\n\
         {{\n\
           \"organizer\": \"string\",\n\
           \"event_type\": \"string\",\n\
           \"attendees\": number,\n\
           \"requirements\": [\"...\"],\n\
           \"constraints\": [\"...\"]\n\
         }}\n\n\
         Rules:\n\
         - Focus only on what the venue must provide or accommodate, not what \
         the organizer brings.\n\
         - Requirements must be lowercase and drawn from this set: {}.\n\
         - If a requirement is not in the set, substitute the most relevant \
         entries from the set.\n\
         - Always include accessibility and safety considerations.",
        AMENITY_VOCABULARY.join(", ")
    )
}

fn enrichment_prompt(event_type: &str, attendees: u32, constraints: &[String]) -> String {
    let existing = if constraints.is_empty() {
        "None".to_string()
    } else {
        constraints.join(", ")
    };
    format!(
        "Given:\n\
         - Event Type: {event_type}\n\
         - Attendees: {attendees}\n\
         - Existing Constraints: {existing}\n\n\
         Provide 3-5 additional constraints as a JSON array:\n\
         [\"constraint 1\", \"constraint 2\", \"constraint 3\"]"
    )
}

/// Result of one extraction run. `error` carries validation or backend
/// failures; an empty requirement list is valid output, not a failure.
#[derive(Debug, Clone, Serialize)]
pub struct IntentExtraction {
    pub query: String,
    pub organizer: Option<String>,
    pub event_type: Option<String>,
    pub attendees: Option<u32>,
    pub requirements: Vec<String>,
    pub constraints: Vec<String>,
    pub enriched_constraints: Vec<String>,
    pub raw_extraction: Option<String>,
    pub error: Option<String>,
    pub retry_count: u32,
}

impl IntentExtraction {
    fn initial(query: &str) -> Self {
        Self {
            query: query.to_string(),
            organizer: None,
            event_type: None,
            attendees: None,
            requirements: Vec::new(),
            constraints: Vec::new(),
            enriched_constraints: Vec::new(),
            raw_extraction: None,
            error: None,
            retry_count: 0,
        }
    }

    /// True when the model never produced a usable extraction (retries
    /// exhausted). Validation problems on an otherwise-parsed extraction are
    /// reported through `error` but are not unrecoverable.
    pub fn is_unrecoverable(&self) -> bool {
        self.error.is_some()
            && self.organizer.is_none()
            && self.event_type.is_none()
            && self.attendees.is_none()
            && self.requirements.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Extract,
    Validate,
    Enrich,
    Format,
}

/// Extract -> Validate -> [Enrich] -> Format state machine with a bounded
/// retry on the extraction call.
pub struct IntentWorkflow<M> {
    model: Arc<M>,
    max_attempts: u32,
}

impl<M: IntentModel> IntentWorkflow<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            max_attempts: 2,
        }
    }

    pub fn extract(&self, query: &str, use_enrichment: bool) -> IntentExtraction {
        let mut state = IntentExtraction::initial(query);
        let mut needs_enrichment = false;
        let mut stage = Stage::Extract;

        loop {
            stage = match stage {
                Stage::Extract => {
                    self.run_extract(&mut state, use_enrichment, &mut needs_enrichment);
                    if state.error.is_some() && state.retry_count < self.max_attempts {
                        Stage::Extract
                    } else {
                        Stage::Validate
                    }
                }
                Stage::Validate => {
                    run_validate(&mut state);
                    if needs_enrichment && state.error.is_none() {
                        Stage::Enrich
                    } else {
                        Stage::Format
                    }
                }
                Stage::Enrich => {
                    self.run_enrich(&mut state);
                    Stage::Format
                }
                Stage::Format => break,
            };
        }

        debug!(
            retries = state.retry_count,
            requirements = state.requirements.len(),
            failed = state.error.is_some(),
            "intent extraction finished"
        );
        state
    }

    fn run_extract(
        &self,
        state: &mut IntentExtraction,
        use_enrichment: bool,
        needs_enrichment: &mut bool,
    ) {
        let user_prompt = format!("Query: {}", state.query);
        let raw = match self.model.complete(&extraction_system_prompt(), &user_prompt) {
            Ok(raw) => raw,
            Err(err) => {
                state.error = Some(format!("extraction failed: {err}"));
                state.retry_count += 1;
                return;
            }
        };

        state.raw_extraction = Some(raw.clone());
        match serde_json::from_str::<RawExtraction>(strip_code_fence(&raw)) {
            Ok(parsed) => {
                state.organizer = parsed.organizer;
                state.event_type = parsed.event_type;
                state.attendees = parsed.attendees;
                state.requirements = parsed.requirements;
                state.constraints = parsed.constraints;
                state.error = None;
                *needs_enrichment = use_enrichment && state.constraints.len() < 2;
            }
            Err(err) => {
                state.error = Some(format!("extraction failed: {err}"));
                state.retry_count += 1;
            }
        }
    }

    fn run_enrich(&self, state: &mut IntentExtraction) {
        let prompt = enrichment_prompt(
            state.event_type.as_deref().unwrap_or_default(),
            state.attendees.unwrap_or_default(),
            &state.constraints,
        );

        let enriched: Result<Vec<String>, String> = self
            .model
            .complete("", &prompt)
            .map_err(|err| err.to_string())
            .and_then(|raw| {
                serde_json::from_str::<Vec<String>>(strip_code_fence(&raw))
                    .map_err(|err| err.to_string())
            });

        match enriched {
            Ok(extra) => {
                for constraint in &extra {
                    if !state.constraints.contains(constraint) {
                        state.constraints.push(constraint.clone());
                    }
                }
                state.enriched_constraints = extra;
            }
            Err(err) => {
                let prior = state.error.take().unwrap_or_default();
                let message = format!("{prior} (enrichment failed: {err})");
                state.error = Some(message.trim_start().to_string());
            }
        }
    }
}

fn run_validate(state: &mut IntentExtraction) {
    let mut errors = Vec::new();

    if state.organizer.as_deref().unwrap_or("").is_empty() {
        errors.push("organizer not identified");
    }
    if state.event_type.as_deref().unwrap_or("").is_empty() {
        errors.push("event type not identified");
    }
    if state.attendees.unwrap_or(0) == 0 {
        errors.push("invalid or missing attendee count");
    }

    if !errors.is_empty() {
        state.error = Some(errors.join("; "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::ModelError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedModel {
        responses: Mutex<VecDeque<Result<String, String>>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<&str, &str>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|response| {
                            response
                                .map(str::to_string)
                                .map_err(str::to_string)
                        })
                        .collect(),
                ),
            })
        }
    }

    impl IntentModel for ScriptedModel {
        fn complete(&self, _system: &str, _user: &str) -> Result<String, ModelError> {
            self.responses
                .lock()
                .expect("script mutex poisoned")
                .pop_front()
                .expect("scripted response available")
                .map_err(ModelError::Backend)
        }
    }

    const GOOD_EXTRACTION: &str = r#"```json
{"organizer": "Chess Club", "event_type": "tournament", "attendees": 30,
 "requirements": ["tables", "chairs"],
 "constraints": ["quiet environment", "evening availability"]}
```"#;

    const SPARSE_EXTRACTION: &str = r#"{"organizer": "Drama Society", "event_type": "rehearsal",
 "attendees": 50, "requirements": ["stage"], "constraints": ["good acoustics"]}"#;

    #[test]
    fn parses_fenced_extraction() {
        let model = ScriptedModel::new(vec![Ok(GOOD_EXTRACTION)]);
        let workflow = IntentWorkflow::new(model);

        let result = workflow.extract("Chess Club tournament for 30 players", true);

        assert!(result.error.is_none());
        assert_eq!(result.organizer.as_deref(), Some("Chess Club"));
        assert_eq!(result.attendees, Some(30));
        assert_eq!(result.requirements, vec!["tables", "chairs"]);
        assert!(result.enriched_constraints.is_empty(), "two constraints skip enrichment");
    }

    #[test]
    fn retries_once_after_backend_failure() {
        let model = ScriptedModel::new(vec![Err("timeout"), Ok(GOOD_EXTRACTION)]);
        let workflow = IntentWorkflow::new(model);

        let result = workflow.extract("Chess Club tournament for 30 players", true);

        assert_eq!(result.retry_count, 1);
        assert!(result.error.is_none());
        assert_eq!(result.event_type.as_deref(), Some("tournament"));
    }

    #[test]
    fn gives_up_after_two_failed_attempts() {
        let model = ScriptedModel::new(vec![Err("timeout"), Err("timeout")]);
        let workflow = IntentWorkflow::new(model);

        let result = workflow.extract("anything", true);

        assert_eq!(result.retry_count, 2);
        assert!(result.error.as_deref().unwrap_or("").contains("extraction failed"));
        assert!(result.is_unrecoverable());
    }

    #[test]
    fn malformed_json_counts_as_a_failed_attempt() {
        let model = ScriptedModel::new(vec![Ok("not json at all"), Ok(GOOD_EXTRACTION)]);
        let workflow = IntentWorkflow::new(model);

        let result = workflow.extract("anything", true);

        assert_eq!(result.retry_count, 1);
        assert!(result.error.is_none());
    }

    #[test]
    fn validation_collects_missing_fields() {
        let model = ScriptedModel::new(vec![Ok(
            r#"{"organizer": null, "event_type": "mixer", "attendees": 0}"#,
        )]);
        let workflow = IntentWorkflow::new(model);

        let result = workflow.extract("vague query", false);

        let error = result.error.clone().expect("validation error");
        assert!(error.contains("organizer not identified"));
        assert!(error.contains("invalid or missing attendee count"));
        assert!(!error.contains("event type"));
        assert!(!result.is_unrecoverable(), "parsed extraction is recoverable");
    }

    #[test]
    fn enriches_when_fewer_than_two_constraints() {
        let model = ScriptedModel::new(vec![
            Ok(SPARSE_EXTRACTION),
            Ok(r#"["good acoustics", "soundproofing", "prop storage"]"#),
        ]);
        let workflow = IntentWorkflow::new(model);

        let result = workflow.extract("Drama Society rehearsal for 50", true);

        assert!(result.error.is_none());
        assert_eq!(result.enriched_constraints.len(), 3);
        // Duplicate "good acoustics" merged away.
        assert_eq!(
            result.constraints,
            vec!["good acoustics", "soundproofing", "prop storage"]
        );
    }

    #[test]
    fn enrichment_disabled_by_caller() {
        let model = ScriptedModel::new(vec![Ok(SPARSE_EXTRACTION)]);
        let workflow = IntentWorkflow::new(model);

        let result = workflow.extract("Drama Society rehearsal for 50", false);

        assert!(result.error.is_none());
        assert!(result.enriched_constraints.is_empty());
        assert_eq!(result.constraints, vec!["good acoustics"]);
    }

    #[test]
    fn enrichment_failure_is_recorded_but_not_fatal() {
        let model = ScriptedModel::new(vec![Ok(SPARSE_EXTRACTION), Err("quota exceeded")]);
        let workflow = IntentWorkflow::new(model);

        let result = workflow.extract("Drama Society rehearsal for 50", true);

        let error = result.error.clone().expect("enrichment error recorded");
        assert!(error.contains("enrichment failed"));
        assert_eq!(result.requirements, vec!["stage"]);
        assert!(!result.is_unrecoverable());
    }
}
