//! The filter -> score -> explain pipeline over the venue graph.
//!
//! [`MatchService`] is the single entry point: it normalizes the requirement
//! set, runs the capacity and coverage filters, ranks the survivors with the
//! composite score, and assembles the reasoning-path explanation alongside
//! the ranked shortlist.

mod explain;
mod filter;
pub mod router;
pub mod scoring;
mod service;

#[cfg(test)]
mod tests;

pub use explain::{NodeGroup, ReasoningEdge, ReasoningNode, ReasoningPath};
pub use filter::FilterCounts;
pub use router::match_router;
pub use scoring::RankingPolicy;
pub use service::{
    normalize_requirements, MatchError, MatchOutcome, MatchRequest, MatchService,
    DEFAULT_MIN_COVERAGE,
};
