use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::models::{Candidate, PlaceDetail};
use crate::services::ports::{PlaceDetailProvider, ProviderError};
use crate::services::rate_limit::provider_limiter;

const TEXT_SEARCH_PATH: &str = "/v1/places:searchText";
const FIELD_MASK: &str = "places.id,places.rating,places.userRatingCount,places.currentOpeningHours.openNow,places.nationalPhoneNumber,places.websiteUri,places.photos.name";
const LOCATION_BIAS_RADIUS_METERS: f64 = 100.0;
const MAX_PHOTOS: usize = 5;

#[derive(Debug, Serialize)]
struct TextSearchBody {
    #[serde(rename = "textQuery")]
    text_query: String,
    #[serde(rename = "maxResultCount")]
    max_result_count: u8,
    #[serde(rename = "locationBias")]
    location_bias: LocationBias,
}

#[derive(Debug, Serialize)]
struct LocationBias {
    circle: BiasCircle,
}

#[derive(Debug, Serialize)]
struct BiasCircle {
    center: BiasCenter,
    radius: f64,
}

#[derive(Debug, Serialize)]
struct BiasCenter {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    places: Option<Vec<DetailPlace>>,
}

#[derive(Debug, Deserialize)]
struct DetailPlace {
    rating: Option<f64>,
    #[serde(rename = "userRatingCount")]
    user_rating_count: Option<u32>,
    #[serde(rename = "currentOpeningHours")]
    current_opening_hours: Option<OpeningHours>,
    #[serde(rename = "nationalPhoneNumber")]
    national_phone_number: Option<String>,
    #[serde(rename = "websiteUri")]
    website_uri: Option<String>,
    #[serde(default)]
    photos: Vec<DetailPhoto>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(rename = "openNow")]
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DetailPhoto {
    name: Option<String>,
}

impl DetailPlace {
    fn into_detail(self) -> PlaceDetail {
        // Ratings outside 0..=5 are dropped
        let rating = self
            .rating
            .filter(|r| r.is_finite() && (0.0..=5.0).contains(r));
        let open_now = self.current_opening_hours.and_then(|h| h.open_now);

        PlaceDetail {
            rating,
            review_count: self.user_rating_count,
            open_now,
            hours_known: open_now.is_some(),
            phone: self.national_phone_number.filter(|p| !p.is_empty()),
            website: self.website_uri.filter(|w| !w.is_empty()),
            photos: self
                .photos
                .into_iter()
                .filter_map(|p| p.name)
                .take(MAX_PHOTOS)
                .collect(),
        }
    }
}

/// Place detail API client
///
/// Resolves a candidate with a single location-biased text search keyed on
/// its name and address, so every enrichment costs exactly one call.
pub struct PlaceDetailClient {
    base_url: String,
    api_key: String,
    client: Client,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl PlaceDetailClient {
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
        requests_per_second: u32,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            limiter: provider_limiter(requests_per_second),
        })
    }

    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::new(
            settings.endpoint.clone(),
            settings.api_key.clone(),
            Duration::from_secs(settings.timeout_secs),
            settings.requests_per_second,
        )
    }
}

#[async_trait]
impl PlaceDetailProvider for PlaceDetailClient {
    async fn detail(&self, candidate: &Candidate) -> Result<PlaceDetail, ProviderError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), TEXT_SEARCH_PATH);
        let body = TextSearchBody {
            text_query: format!("{} {}", candidate.name, candidate.address).trim().to_string(),
            max_result_count: 1,
            location_bias: LocationBias {
                circle: BiasCircle {
                    center: BiasCenter {
                        latitude: candidate.latitude,
                        longitude: candidate.longitude,
                    },
                    radius: LOCATION_BIAS_RADIUS_METERS,
                },
            },
        };

        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        tracing::debug!("Fetching detail for {} ({})", candidate.external_id, candidate.name);

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError {
                status: response.status().as_u16(),
                message: format!("Failed to fetch detail for {}", candidate.external_id),
            });
        }

        let parsed: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse detail response: {}", e)))?;

        parsed
            .places
            .and_then(|places| places.into_iter().next())
            .map(DetailPlace::into_detail)
            .ok_or_else(|| ProviderError::NotFound(format!("No detail for {}", candidate.external_id)))
    }
}
