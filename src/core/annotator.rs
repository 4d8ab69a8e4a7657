use crate::models::{DegradedStage, EnrichedCandidate};
use crate::services::PreferenceStore;

/// Attach local tags to every ranked result with one batch lookup
///
/// Results always carry a tag list, empty when the place has no tags or
/// the store failed. Returns the degraded stage on store failure.
pub async fn annotate_tags(
    store: &dyn PreferenceStore,
    mut results: Vec<EnrichedCandidate>,
) -> (Vec<EnrichedCandidate>, Option<DegradedStage>) {
    if results.is_empty() {
        return (results, None);
    }

    let external_ids: Vec<String> = results.iter().map(|r| r.external_id().to_string()).collect();

    let mut tags = match store.tags_for(&external_ids).await {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!(
                stage = DegradedStage::TagAnnotation.as_str(),
                error = %e,
                "Preference store unavailable, returning results without tags"
            );
            for result in &mut results {
                result.tags.clear();
            }
            return (results, Some(DegradedStage::TagAnnotation));
        }
    };

    for result in &mut results {
        result.tags = tags.remove(result.external_id()).unwrap_or_default();
    }

    (results, None)
}
