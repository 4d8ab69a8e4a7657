use serde::{Deserialize, Serialize};
use crate::models::domain::{DegradedStage, EnrichedCandidate, PipelineResult};

/// Response for the recommend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub results: Vec<EnrichedCandidate>,
    #[serde(rename = "exclusionCount")]
    pub exclusion_count: usize,
    #[serde(rename = "tagExclusionCount")]
    pub tag_exclusion_count: usize,
    #[serde(rename = "favoriteExclusionCount")]
    pub favorite_exclusion_count: usize,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "degradedStages", default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_stages: Vec<DegradedStage>,
}

impl From<PipelineResult> for RecommendResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            total_results: result.results.len(),
            results: result.results,
            exclusion_count: result.exclusion_count,
            tag_exclusion_count: result.tag_exclusion_count,
            favorite_exclusion_count: result.favorite_exclusion_count,
            degraded_stages: result.degraded,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
