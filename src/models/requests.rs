use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::RecommendationSettings;
use crate::core::PipelineError;
use crate::models::domain::{Location, RequestCriteria, SortMode};

/// Request to recommend restaurants around a location
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[validate(length(max = 10))]
    #[serde(default)]
    pub categories: Vec<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default)]
    pub sort: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<usize>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(alias = "min_rating", rename = "minRating", default)]
    pub min_rating: f64,
    #[serde(alias = "open_now_only", rename = "openNowOnly", default)]
    pub open_now_only: bool,
    #[serde(alias = "include_unknown_hours", rename = "includeUnknownHours", default)]
    pub include_unknown_hours: bool,
    #[serde(alias = "tag_ids", rename = "tagIds", default)]
    pub tag_ids: Vec<i64>,
    #[serde(alias = "favorites_only", rename = "favoritesOnly", default)]
    pub favorites_only: bool,
}

impl RecommendRequest {
    /// Resolve defaults and bounds into pipeline criteria
    pub fn into_criteria(
        self,
        settings: &RecommendationSettings,
        default_categories: &[String],
    ) -> Result<RequestCriteria, PipelineError> {
        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Location::new(lat, lng),
            _ => {
                return Err(PipelineError::Validation(
                    "latitude and longitude are required".to_string(),
                ))
            }
        };

        let sort_mode = match self.sort.as_deref() {
            Some(raw) => raw.parse::<SortMode>().map_err(PipelineError::Validation)?,
            None => SortMode::default(),
        };

        let radius_meters = self
            .radius
            .unwrap_or(settings.default_radius_meters)
            .min(settings.max_radius_meters);
        let result_budget = self
            .limit
            .unwrap_or(settings.default_result_budget)
            .min(settings.max_result_budget);

        let categories: Vec<String> = self
            .categories
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        let categories = if categories.is_empty() {
            default_categories.to_vec()
        } else {
            categories
        };

        Ok(RequestCriteria {
            user_id: self.user_id.filter(|id| !id.trim().is_empty()),
            location,
            categories,
            radius_meters,
            sort_mode,
            result_budget,
            min_rating: self.min_rating,
            open_now_only: self.open_now_only,
            include_unknown_hours: self.include_unknown_hours,
            tag_ids: self.tag_ids,
            favorites_only: self.favorites_only,
        })
    }
}
