// Core pipeline exports
pub mod annotator;
pub mod distance;
pub mod enrichment;
pub mod filters;
pub mod pipeline;
pub mod ranker;
pub mod sourcer;

pub use annotator::annotate_tags;
pub use distance::{haversine_distance, haversine_distance_meters};
pub use enrichment::{enrich_until_budget, passes_quality, EnrichmentOutcome};
pub use filters::{apply_exclusions, remove_excluded, retain_allowed, FilterOutcome};
pub use pipeline::{PipelineError, RecommendationPipeline};
pub use ranker::rank;
pub use sourcer::{CandidateSourcer, SourcingOutcome};
