//! Forkcast - restaurant recommendation pipeline
//!
//! Turns a location and stated preferences into a bounded, ordered list of
//! nearby restaurants: multi-category search with dedup, personal
//! exclusions, budgeted detail enrichment, ranking and tag annotation.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{CandidateSourcer, PipelineError, RecommendationPipeline};
pub use models::{
    Candidate, EnrichedCandidate, Location, PipelineResult, PlaceDetail, RecommendRequest,
    RecommendResponse, RequestCriteria, SortMode, Tag,
};
pub use services::{PlaceDetailProvider, PlaceSearchProvider, PreferenceStore};
