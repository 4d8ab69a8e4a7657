use std::collections::HashSet;

use crate::models::{Candidate, DegradedStage, RequestCriteria};
use crate::services::PreferenceStore;

/// Candidates left after personal filtering, with per-stage removal counts
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub candidates: Vec<Candidate>,
    pub exclusion_count: usize,
    pub tag_exclusion_count: usize,
    pub favorite_exclusion_count: usize,
    pub degraded: Vec<DegradedStage>,
}

/// Drop candidates whose external id is in `excluded`
///
/// Returns the number removed.
#[inline]
pub fn remove_excluded(candidates: &mut Vec<Candidate>, excluded: &HashSet<String>) -> usize {
    let before = candidates.len();
    candidates.retain(|c| !excluded.contains(&c.external_id));
    before - candidates.len()
}

/// Keep only candidates whose external id is in `allowed`
///
/// Returns the number removed.
#[inline]
pub fn retain_allowed(candidates: &mut Vec<Candidate>, allowed: &HashSet<String>) -> usize {
    let before = candidates.len();
    candidates.retain(|c| allowed.contains(&c.external_id));
    before - candidates.len()
}

/// Apply blacklist, tag and favorites filtering in that fixed order
///
/// Every stage is fail-open: when the store errors, the stage is skipped,
/// its count stays zero and the stage is reported as degraded.
pub async fn apply_exclusions(
    store: &dyn PreferenceStore,
    criteria: &RequestCriteria,
    candidates: Vec<Candidate>,
) -> FilterOutcome {
    let mut outcome = FilterOutcome {
        candidates,
        ..FilterOutcome::default()
    };

    // Stage 1: personal blacklist (authenticated callers only)
    if let Some(user_id) = criteria.user_id.as_deref() {
        match store.blacklist(user_id).await {
            Ok(blacklist) => {
                outcome.exclusion_count = remove_excluded(&mut outcome.candidates, &blacklist);
            }
            Err(e) => {
                tracing::warn!(
                    stage = DegradedStage::Blacklist.as_str(),
                    user_id,
                    error = %e,
                    "Preference store unavailable, skipping blacklist filter"
                );
                outcome.degraded.push(DegradedStage::Blacklist);
            }
        }
    }

    // Stage 2: tag filter; an empty tag list means no filter, not an empty set
    if !criteria.tag_ids.is_empty() {
        match store.tagged_restaurants(&criteria.tag_ids).await {
            Ok(tagged) => {
                outcome.tag_exclusion_count = retain_allowed(&mut outcome.candidates, &tagged);
            }
            Err(e) => {
                tracing::warn!(
                    stage = DegradedStage::TagFilter.as_str(),
                    tag_ids = ?criteria.tag_ids,
                    error = %e,
                    "Preference store unavailable, skipping tag filter"
                );
                outcome.degraded.push(DegradedStage::TagFilter);
            }
        }
    }

    // Stage 3: favorites only
    if criteria.favorites_only {
        match criteria.user_id.as_deref() {
            Some(user_id) => match store.favorites(user_id).await {
                Ok(favorites) => {
                    outcome.favorite_exclusion_count = retain_allowed(&mut outcome.candidates, &favorites);
                }
                Err(e) => {
                    tracing::warn!(
                        stage = DegradedStage::Favorites.as_str(),
                        user_id,
                        error = %e,
                        "Preference store unavailable, skipping favorites filter"
                    );
                    outcome.degraded.push(DegradedStage::Favorites);
                }
            },
            None => {
                tracing::debug!("favoritesOnly requested without a user, skipping favorites filter");
            }
        }
    }

    outcome
}
