use crate::models::{Candidate, EnrichedCandidate, PlaceDetail, RequestCriteria};
use crate::services::PlaceDetailProvider;

/// Candidates accepted by the quality gate plus call statistics
///
/// The statistics are for logging only and never reach the caller.
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    /// Accepted candidates in input order, at most `result_budget`
    pub accepted: Vec<EnrichedCandidate>,
    pub detail_calls: usize,
    pub detail_failures: usize,
    pub quality_rejected: usize,
    /// Filtered candidates never enriched because the budget was met
    pub skipped: usize,
}

/// Quality predicate applied to each enriched candidate
///
/// `rating >= min_rating` (missing rating counts as 0), and when
/// `open_now_only` is set the place must be open now, or have unknown
/// hours while `include_unknown_hours` is set.
#[inline]
pub fn passes_quality(detail: &PlaceDetail, criteria: &RequestCriteria) -> bool {
    if detail.rating_or_zero() < criteria.min_rating {
        return false;
    }

    if !criteria.open_now_only {
        return true;
    }

    detail.open_now == Some(true) || (criteria.include_unknown_hours && !detail.hours_known)
}

/// Enrich candidates one at a time, in order, until the budget is met
///
/// Provider calls are bounded by `result_budget` plus the number of
/// quality rejections seen before the budget filled. A failed detail
/// fetch is judged with `PlaceDetail::unavailable()` instead of aborting.
pub async fn enrich_until_budget(
    provider: &dyn PlaceDetailProvider,
    criteria: &RequestCriteria,
    candidates: Vec<Candidate>,
) -> EnrichmentOutcome {
    let total = candidates.len();
    let mut outcome = EnrichmentOutcome {
        accepted: Vec::with_capacity(criteria.result_budget.min(total)),
        ..EnrichmentOutcome::default()
    };

    for candidate in candidates {
        if outcome.accepted.len() >= criteria.result_budget {
            break;
        }

        outcome.detail_calls += 1;
        let detail = match provider.detail(&candidate).await {
            Ok(detail) => detail,
            Err(e) => {
                outcome.detail_failures += 1;
                tracing::debug!(
                    external_id = %candidate.external_id,
                    error = %e,
                    "Detail fetch failed, evaluating with defaults"
                );
                PlaceDetail::unavailable()
            }
        };

        if passes_quality(&detail, criteria) {
            outcome.accepted.push(EnrichedCandidate::new(candidate, detail));
        } else {
            outcome.quality_rejected += 1;
        }
    }

    outcome.skipped = total - outcome.detail_calls;

    tracing::debug!(
        "Enrichment accepted {} of {} candidates ({} calls, {} failed, {} rejected, {} skipped)",
        outcome.accepted.len(),
        total,
        outcome.detail_calls,
        outcome.detail_failures,
        outcome.quality_rejected,
        outcome.skipped
    );

    outcome
}
