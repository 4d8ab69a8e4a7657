use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both coordinates finite and inside their valid ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Raw search hit from the place search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "externalId")]
    pub external_id: String,
    pub name: String,
    #[serde(rename = "categoryPath")]
    pub category_path: Vec<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "distanceMeters")]
    pub distance_meters: f64,
    #[serde(rename = "detailUrl")]
    pub detail_url: String,
}

/// Secondary detail for one candidate, as returned by the detail provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub open_now: Option<bool>,
    pub hours_known: bool,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub photos: Vec<String>,
}

impl PlaceDetail {
    /// Detail used when enrichment failed: no rating, unknown hours
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// User-curated tag attached to restaurants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Candidate merged with its enrichment detail and local tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub rating: Option<f64>,
    #[serde(rename = "reviewCount")]
    pub review_count: Option<u32>,
    #[serde(rename = "openNow")]
    pub open_now: Option<bool>,
    #[serde(rename = "hoursKnown")]
    pub hours_known: bool,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub photos: Vec<String>,
    pub tags: Vec<Tag>,
}

impl EnrichedCandidate {
    pub fn new(candidate: Candidate, detail: PlaceDetail) -> Self {
        Self {
            candidate,
            rating: detail.rating,
            review_count: detail.review_count,
            open_now: detail.open_now,
            hours_known: detail.hours_known,
            phone: detail.phone,
            website: detail.website,
            photos: detail.photos,
            tags: Vec::new(),
        }
    }

    pub fn external_id(&self) -> &str {
        &self.candidate.external_id
    }

    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// Result ordering requested by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Accuracy,
    Distance,
    Rating,
}

impl SortMode {
    /// Ordering hint forwarded to the search provider
    pub fn sort_hint(self) -> SortHint {
        match self {
            SortMode::Distance => SortHint::Distance,
            SortMode::Accuracy | SortMode::Rating => SortHint::Accuracy,
        }
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accuracy" => Ok(SortMode::Accuracy),
            "distance" => Ok(SortMode::Distance),
            "rating" => Ok(SortMode::Rating),
            other => Err(format!(
                "unknown sort mode '{}', expected one of: accuracy, distance, rating",
                other
            )),
        }
    }
}

/// Provider-side ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortHint {
    Accuracy,
    Distance,
}

impl SortHint {
    pub fn as_str(self) -> &'static str {
        match self {
            SortHint::Accuracy => "accuracy",
            SortHint::Distance => "distance",
        }
    }
}

/// Immutable, request-scoped recommendation criteria
#[derive(Debug, Clone, PartialEq)]
pub struct RequestCriteria {
    pub user_id: Option<String>,
    pub location: Location,
    pub categories: Vec<String>,
    pub radius_meters: u32,
    pub sort_mode: SortMode,
    pub result_budget: usize,
    pub min_rating: f64,
    pub open_now_only: bool,
    pub include_unknown_hours: bool,
    pub tag_ids: Vec<i64>,
    pub favorites_only: bool,
}

impl RequestCriteria {
    /// Criteria with neutral filters: no rating floor, no hours or tag constraints
    pub fn new(location: Location, categories: Vec<String>, radius_meters: u32, result_budget: usize) -> Self {
        Self {
            user_id: None,
            location,
            categories,
            radius_meters,
            sort_mode: SortMode::Accuracy,
            result_budget,
            min_rating: 0.0,
            open_now_only: false,
            include_unknown_hours: false,
            tag_ids: Vec::new(),
            favorites_only: false,
        }
    }
}

/// Stage skipped because the preference store failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedStage {
    Blacklist,
    TagFilter,
    Favorites,
    TagAnnotation,
}

impl DegradedStage {
    pub fn as_str(self) -> &'static str {
        match self {
            DegradedStage::Blacklist => "blacklist",
            DegradedStage::TagFilter => "tag_filter",
            DegradedStage::Favorites => "favorites",
            DegradedStage::TagAnnotation => "tag_annotation",
        }
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineResult {
    pub results: Vec<EnrichedCandidate>,
    pub exclusion_count: usize,
    pub tag_exclusion_count: usize,
    pub favorite_exclusion_count: usize,
    pub degraded: Vec<DegradedStage>,
}
