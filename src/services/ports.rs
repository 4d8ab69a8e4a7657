use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::models::{Candidate, Location, PlaceDetail, SortHint, Tag};

/// Errors returned by the external place providers
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Errors returned by the preference store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// One (keyword, page) search request
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    pub keyword: &'a str,
    pub location: Location,
    pub radius_meters: u32,
    pub sort_hint: SortHint,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

/// One page of search hits
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub candidates: Vec<Candidate>,
    /// Provider reports no further pages for this keyword
    pub is_end: bool,
}

/// Paginated keyword + geo search
#[async_trait]
pub trait PlaceSearchProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage, ProviderError>;
}

/// Per-candidate detail enrichment (rating, hours, photos)
#[async_trait]
pub trait PlaceDetailProvider: Send + Sync {
    async fn detail(&self, candidate: &Candidate) -> Result<PlaceDetail, ProviderError>;
}

/// Per-user blacklist, favorites and tag associations
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn blacklist(&self, user_id: &str) -> Result<HashSet<String>, StoreError>;

    async fn favorites(&self, user_id: &str) -> Result<HashSet<String>, StoreError>;

    /// External ids linked to any of the given tags
    async fn tagged_restaurants(&self, tag_ids: &[i64]) -> Result<HashSet<String>, StoreError>;

    /// Tags for each external id; ids without tags may be absent from the map
    async fn tags_for(&self, external_ids: &[String]) -> Result<HashMap<String, Vec<Tag>>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
