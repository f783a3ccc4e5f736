//! EAGLE Pipeline - Query orchestration
//!
//! Sequences the three stages of a query: resolve a location, analyze the
//! text, and compute change layers for the resolved bounding box. Each stage
//! substitutes a degraded result on failure, except geocoding, whose failure
//! ends the request.

pub mod location;
pub mod orchestrator;
pub mod response;

pub use location::extract_location_phrase;
pub use orchestrator::QueryOrchestrator;
pub use response::{QueryResponse, QUERY_PROCESSED};
