use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::core::distance::haversine_distance_meters;
use crate::models::{Candidate, Location};
use crate::services::ports::{PlaceSearchProvider, ProviderError, SearchPage, SearchQuery};
use crate::services::rate_limit::provider_limiter;

const KEYWORD_SEARCH_PATH: &str = "/v2/local/search/keyword.json";

#[derive(Debug, Deserialize)]
struct KeywordSearchResponse {
    meta: Option<SearchMeta>,
    documents: Option<Vec<SearchDocument>>,
}

#[derive(Debug, Deserialize)]
struct SearchMeta {
    #[serde(default)]
    is_end: bool,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    category_name: String,
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    road_address_name: String,
    #[serde(default)]
    x: String,
    #[serde(default)]
    y: String,
    #[serde(default)]
    distance: String,
    #[serde(default)]
    place_url: String,
}

impl SearchDocument {
    /// Validate the loosely-typed payload into a candidate
    fn into_candidate(self, origin: &Location) -> Result<Candidate, String> {
        if self.id.trim().is_empty() {
            return Err("missing id".to_string());
        }
        if self.place_name.trim().is_empty() {
            return Err(format!("{}: missing place_name", self.id));
        }

        let longitude: f64 = self
            .x
            .trim()
            .parse()
            .map_err(|_| format!("{}: invalid x '{}'", self.id, self.x))?;
        let latitude: f64 = self
            .y
            .trim()
            .parse()
            .map_err(|_| format!("{}: invalid y '{}'", self.id, self.y))?;
        let position = Location::new(latitude, longitude);
        if !position.is_valid() {
            return Err(format!("{}: coordinates out of range", self.id));
        }

        let distance_meters = self
            .distance
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or_else(|| haversine_distance_meters(origin, &position));

        let address = if self.road_address_name.trim().is_empty() {
            self.address_name
        } else {
            self.road_address_name
        };

        Ok(Candidate {
            external_id: self.id,
            name: self.place_name,
            category_path: split_category_path(&self.category_name),
            address,
            latitude,
            longitude,
            distance_meters,
            detail_url: self.place_url,
        })
    }
}

/// Split a provider category string like `Food > Korean > BBQ`
pub fn split_category_path(raw: &str) -> Vec<String> {
    raw.split('>')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Local keyword search API client
pub struct LocalSearchClient {
    base_url: String,
    api_key: String,
    client: Client,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl LocalSearchClient {
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

    fn build_url(&self, query: &SearchQuery<'_>) -> String {
        format!(
            "{}{}?query={}&x={}&y={}&radius={}&page={}&size={}&sort={}",
            self.base_url.trim_end_matches('/'),
            KEYWORD_SEARCH_PATH,
            urlencoding::encode(query.keyword),
            query.location.longitude,
            query.location.latitude,
            query.radius_meters,
            query.page,
            query.page_size,
            query.sort_hint.as_str(),
        )
    }
}

#[async_trait]
impl PlaceSearchProvider for LocalSearchClient {
    async fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage, ProviderError> {
        let url = self.build_url(query);

        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        tracing::debug!("Searching '{}' page {}", query.keyword, query.page);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: KeywordSearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse search response: {}", e)))?;

        let documents = parsed
            .documents
            .ok_or_else(|| ProviderError::InvalidResponse("Missing documents array".into()))?;
        let is_end = parsed.meta.map(|m| m.is_end).unwrap_or(true);

        let mut candidates = Vec::with_capacity(documents.len());
        for doc in documents {
            match doc.into_candidate(&query.location) {
                Ok(candidate) => candidates.push(candidate),
                Err(reason) => tracing::debug!("Dropping invalid search document: {}", reason),
            }
        }

        tracing::debug!(
            "Search '{}' page {} returned {} candidates (is_end: {})",
            query.keyword,
            query.page,
            candidates.len(),
            is_end
        );

        Ok(SearchPage { candidates, is_end })
    }
}
