// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, DegradedStage, EnrichedCandidate, Location, PipelineResult, PlaceDetail,
    RequestCriteria, SortHint, SortMode, Tag,
};
pub use requests::RecommendRequest;
pub use responses::{ErrorResponse, HealthResponse, RecommendResponse};
