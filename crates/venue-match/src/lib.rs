//! Venue matching engine.
//!
//! Pairs structured event-booking requirements (attendee count plus a set of
//! amenity names) with venues stored in a campus property graph. The crate is
//! organized around a read-only [`graph::VenueStore`] abstraction, a
//! filter/score/explain pipeline under [`matching`], and the upstream
//! [`intent`] workflow that turns free-text queries into requirement sets.

pub mod config;
pub mod error;
pub mod graph;
pub mod intent;
pub mod matching;
pub mod telemetry;
