//! Intent extraction: turns a free-text booking query into the structured
//! requirement set the matching engine consumes.
//!
//! The workflow is a four-state machine (extract, validate, optional
//! enrichment, format) over a single-call text-generation backend. The
//! backend sits behind [`IntentModel`] so tests and the offline CLI can run
//! without a hosted model.

pub mod defaults;
mod model;
mod workflow;

pub use model::{IntentModel, ModelError};
pub use workflow::{IntentExtraction, IntentWorkflow, AMENITY_VOCABULARY};
