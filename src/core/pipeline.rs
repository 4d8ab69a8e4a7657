use std::sync::Arc;
use thiserror::Error;

use crate::config::RecommendationSettings;
use crate::core::{
    annotator::annotate_tags,
    enrichment::enrich_until_budget,
    filters::apply_exclusions,
    ranker::rank,
    sourcer::CandidateSourcer,
};
use crate::models::{PipelineResult, RequestCriteria};
use crate::services::{PlaceDetailProvider, PlaceSearchProvider, PreferenceStore};

/// Errors that stop a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Search provider unavailable: all {attempted} search calls failed")]
    SearchUnavailable { attempted: usize },
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Candidate sourcing (multi-category, multi-page search + dedup)
/// 2. Exclusion filtering (blacklist, tags, favorites)
/// 3. Bounded enrichment with quality gate and early stop
/// 4. Ranking by sort mode
/// 5. Tag annotation
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct RecommendationPipeline {
    search: Arc<dyn PlaceSearchProvider>,
    detail: Arc<dyn PlaceDetailProvider>,
    store: Arc<dyn PreferenceStore>,
    sourcer: CandidateSourcer,
    limits: RecommendationSettings,
}

impl RecommendationPipeline {
    pub fn new(
        search: Arc<dyn PlaceSearchProvider>,
        detail: Arc<dyn PlaceDetailProvider>,
        store: Arc<dyn PreferenceStore>,
        sourcer: CandidateSourcer,
    ) -> Self {
        Self {
            search,
            detail,
            store,
            sourcer,
            limits: RecommendationSettings::default(),
        }
    }

    /// Replace the default radius and budget caps
    pub fn with_limits(mut self, limits: RecommendationSettings) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &RecommendationSettings {
        &self.limits
    }

    pub fn sourcer(&self) -> &CandidateSourcer {
        &self.sourcer
    }

    /// Check criteria before any provider is called
    pub fn validate(criteria: &RequestCriteria, limits: &RecommendationSettings) -> Result<(), PipelineError> {
        if !criteria.location.is_valid() {
            return Err(PipelineError::Validation(format!(
                "invalid location ({}, {})",
                criteria.location.latitude, criteria.location.longitude
            )));
        }
        if criteria.categories.is_empty() {
            return Err(PipelineError::Validation("at least one category is required".to_string()));
        }
        if criteria.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(PipelineError::Validation("categories must not be blank".to_string()));
        }
        if !(1..=limits.max_radius_meters).contains(&criteria.radius_meters) {
            return Err(PipelineError::Validation(format!(
                "radius must be within 1..={} meters, got {}",
                limits.max_radius_meters, criteria.radius_meters
            )));
        }
        if !(1..=limits.max_result_budget).contains(&criteria.result_budget) {
            return Err(PipelineError::Validation(format!(
                "result budget must be within 1..={}, got {}",
                limits.max_result_budget, criteria.result_budget
            )));
        }
        if !criteria.min_rating.is_finite() || !(0.0..=5.0).contains(&criteria.min_rating) {
            return Err(PipelineError::Validation(format!(
                "minRating must be within 0..=5, got {}",
                criteria.min_rating
            )));
        }
        Ok(())
    }

    /// Run the full pipeline for one request
    ///
    /// Only validation failures and a total search outage are errors; every
    /// other failure degrades the result instead.
    pub async fn run(&self, criteria: &RequestCriteria) -> Result<PipelineResult, PipelineError> {
        Self::validate(criteria, &self.limits)?;

        // Stage 1: sourcing
        let sourced = self.sourcer.source(self.search.as_ref(), criteria).await?;
        let sourced_count = sourced.candidates.len();

        if sourced.candidates.is_empty() {
            tracing::info!("No candidates found for categories {:?}", criteria.categories);
            return Ok(PipelineResult::default());
        }

        // Stage 2: exclusion, tag and favorites filtering
        let filtered = apply_exclusions(self.store.as_ref(), criteria, sourced.candidates).await;
        let mut degraded = filtered.degraded;

        // Stage 3: enrichment + quality gate
        let enriched = enrich_until_budget(self.detail.as_ref(), criteria, filtered.candidates).await;

        // Stage 4: ranking
        let ranked = rank(enriched.accepted, criteria.sort_mode);

        // Stage 5: tag annotation
        let (results, annotation_degraded) = annotate_tags(self.store.as_ref(), ranked).await;
        degraded.extend(annotation_degraded);

        tracing::info!(
            sourced = sourced_count,
            excluded = filtered.exclusion_count,
            tag_excluded = filtered.tag_exclusion_count,
            favorite_excluded = filtered.favorite_exclusion_count,
            detail_calls = enriched.detail_calls,
            quality_rejected = enriched.quality_rejected,
            returned = results.len(),
            "Recommendation pipeline finished"
        );

        Ok(PipelineResult {
            results,
            exclusion_count: filtered.exclusion_count,
            tag_exclusion_count: filtered.tag_exclusion_count,
            favorite_exclusion_count: filtered.favorite_exclusion_count,
            degraded,
        })
    }
}

impl std::fmt::Debug for RecommendationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationPipeline")
            .field("sourcer", &self.sourcer)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
