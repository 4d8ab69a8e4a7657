use std::collections::HashSet;

use crate::config::SourcingSettings;
use crate::core::pipeline::PipelineError;
use crate::models::{Candidate, RequestCriteria};
use crate::services::{PlaceSearchProvider, SearchQuery};

/// Pages requested per category before giving up on it
pub const DEFAULT_PAGES_PER_CATEGORY: u32 = 3;

/// Results requested per search page
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Deduplicated search hits plus call bookkeeping
#[derive(Debug, Default)]
pub struct SourcingOutcome {
    /// Unique by external id, in first-seen order
    pub candidates: Vec<Candidate>,
    pub attempted_calls: usize,
    pub failed_calls: usize,
}

/// Fans out (category, page) searches and merges the hits
///
/// First-seen order across categories, then pages, is the relevance
/// baseline every later stage preserves.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSourcer {
    pages_per_category: u32,
    page_size: u32,
}

impl CandidateSourcer {
    pub fn new(pages_per_category: u32, page_size: u32) -> Self {
        Self {
            pages_per_category: pages_per_category.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn from_settings(settings: &SourcingSettings) -> Self {
        Self::new(settings.pages_per_category, settings.page_size)
    }

    pub fn pages_per_category(&self) -> u32 {
        self.pages_per_category
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Search every category page by page and dedup by external id
    ///
    /// A failed call is logged and skipped. Only when every attempted call
    /// fails is the outcome an error.
    pub async fn source(
        &self,
        provider: &dyn PlaceSearchProvider,
        criteria: &RequestCriteria,
    ) -> Result<SourcingOutcome, PipelineError> {
        let mut outcome = SourcingOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();
        let sort_hint = criteria.sort_mode.sort_hint();

        for keyword in &criteria.categories {
            for page in 1..=self.pages_per_category {
                let query = SearchQuery {
                    keyword,
                    location: criteria.location,
                    radius_meters: criteria.radius_meters,
                    sort_hint,
                    page,
                    page_size: self.page_size,
                };

                outcome.attempted_calls += 1;
                let result = match provider.search(&query).await {
                    Ok(result) => result,
                    Err(e) => {
                        outcome.failed_calls += 1;
                        tracing::warn!(
                            category = %keyword,
                            page,
                            error = %e,
                            "Search call failed, skipping page"
                        );
                        continue;
                    }
                };

                let is_end = result.is_end;
                for candidate in result.candidates {
                    if seen.insert(candidate.external_id.clone()) {
                        outcome.candidates.push(candidate);
                    }
                }

                if is_end {
                    break;
                }
            }
        }

        if outcome.attempted_calls > 0 && outcome.failed_calls == outcome.attempted_calls {
            tracing::error!(
                "All {} search calls failed for categories {:?}",
                outcome.attempted_calls,
                criteria.categories
            );
            return Err(PipelineError::SearchUnavailable {
                attempted: outcome.attempted_calls,
            });
        }

        tracing::debug!(
            "Sourced {} unique candidates from {} calls ({} failed)",
            outcome.candidates.len(),
            outcome.attempted_calls,
            outcome.failed_calls
        );

        Ok(outcome)
    }
}

impl Default for CandidateSourcer {
    fn default() -> Self {
        Self::new(DEFAULT_PAGES_PER_CATEGORY, DEFAULT_PAGE_SIZE)
    }
}
