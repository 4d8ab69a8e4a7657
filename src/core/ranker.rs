use crate::models::{EnrichedCandidate, SortMode};

/// Order accepted candidates for the requested sort mode
///
/// `accuracy` and `distance` keep the accumulation order (the provider
/// already ordered by the hint). `rating` is a stable descending sort with
/// missing ratings as 0, so ties keep their input order.
pub fn rank(mut candidates: Vec<EnrichedCandidate>, sort_mode: SortMode) -> Vec<EnrichedCandidate> {
    match sort_mode {
        SortMode::Accuracy | SortMode::Distance => {}
        SortMode::Rating => {
            candidates.sort_by(|a, b| b.rating_or_zero().total_cmp(&a.rating_or_zero()));
        }
    }

    candidates
}
