// Shared in-process fakes for the pipeline integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use forkcast::core::{CandidateSourcer, RecommendationPipeline};
use forkcast::models::{Candidate, Location, PlaceDetail, RequestCriteria, SortHint, Tag};
use forkcast::services::{
    PlaceDetailProvider, PlaceSearchProvider, PreferenceStore, ProviderError, SearchPage,
    SearchQuery, StoreError,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn candidate(id: &str) -> Candidate {
    Candidate {
        external_id: id.to_string(),
        name: format!("Restaurant {}", id),
        category_path: vec!["Food".to_string(), "Korean".to_string()],
        address: format!("{} Main St", id),
        latitude: 37.5665,
        longitude: 126.9780,
        distance_meters: 150.0,
        detail_url: format!("https://place.example/{}", id),
    }
}

pub fn rated(rating: f64) -> PlaceDetail {
    PlaceDetail {
        rating: Some(rating),
        ..PlaceDetail::default()
    }
}

pub fn rated_open(rating: f64, open_now: bool) -> PlaceDetail {
    PlaceDetail {
        rating: Some(rating),
        open_now: Some(open_now),
        hours_known: true,
        ..PlaceDetail::default()
    }
}

pub fn criteria(categories: &[&str], result_budget: usize) -> RequestCriteria {
    RequestCriteria::new(
        Location::new(37.5665, 126.9780),
        categories.iter().map(|c| c.to_string()).collect(),
        1000,
        result_budget,
    )
}

/// Search provider scripted per (keyword, page)
///
/// Unscripted pages return an empty final page; pages marked failing error.
#[derive(Default)]
pub struct FakeSearch {
    pages: HashMap<(String, u32), SearchPage>,
    failing: HashSet<(String, u32)>,
    fail_everything: bool,
    pub calls: Mutex<Vec<(String, u32)>>,
    pub sort_hints: Mutex<Vec<SortHint>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, keyword: &str, page: u32, ids: &[&str], is_end: bool) -> Self {
        self.pages.insert(
            (keyword.to_string(), page),
            SearchPage {
                candidates: ids.iter().map(|id| candidate(id)).collect(),
                is_end,
            },
        );
        self
    }

    pub fn failing_page(mut self, keyword: &str, page: u32) -> Self {
        self.failing.insert((keyword.to_string(), page));
        self
    }

    pub fn unavailable() -> Self {
        Self {
            fail_everything: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn sort_hints(&self) -> Vec<SortHint> {
        self.sort_hints.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearchProvider for FakeSearch {
    async fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage, ProviderError> {
        let key = (query.keyword.to_string(), query.page);
        self.calls.lock().unwrap().push(key.clone());
        self.sort_hints.lock().unwrap().push(query.sort_hint);

        if self.fail_everything || self.failing.contains(&key) {
            return Err(ProviderError::ApiError {
                status: 503,
                message: "search backend down".to_string(),
            });
        }

        Ok(self.pages.get(&key).cloned().unwrap_or(SearchPage {
            candidates: Vec::new(),
            is_end: true,
        }))
    }
}

/// Detail provider keyed by external id; unknown ids fail
#[derive(Default)]
pub struct FakeDetails {
    details: HashMap<String, PlaceDetail>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, detail: PlaceDetail) -> Self {
        self.details.insert(id.to_string(), detail);
        self
    }

    pub fn all(ids: &[&str], detail: PlaceDetail) -> Self {
        ids.iter().fold(Self::new(), |fake, id| fake.with(id, detail.clone()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceDetailProvider for FakeDetails {
    async fn detail(&self, candidate: &Candidate) -> Result<PlaceDetail, ProviderError> {
        self.calls.lock().unwrap().push(candidate.external_id.clone());
        self.details
            .get(&candidate.external_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(candidate.external_id.clone()))
    }
}

/// In-memory preference store; `unavailable` makes every lookup fail
#[derive(Default)]
pub struct FakeStore {
    blacklists: HashMap<String, HashSet<String>>,
    favorites: HashMap<String, HashSet<String>>,
    tagged: HashMap<i64, HashSet<String>>,
    tags: HashMap<String, Vec<Tag>>,
    unavailable: bool,
    pub tag_lookups: Mutex<usize>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn blacklist(mut self, user_id: &str, ids: &[&str]) -> Self {
        self.blacklists
            .insert(user_id.to_string(), ids.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn favorites(mut self, user_id: &str, ids: &[&str]) -> Self {
        self.favorites
            .insert(user_id.to_string(), ids.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Link restaurants to a tag, for both filtering and annotation
    pub fn tag(mut self, tag_id: i64, name: &str, ids: &[&str]) -> Self {
        for id in ids {
            self.tagged.entry(tag_id).or_default().insert(id.to_string());
            self.tags.entry(id.to_string()).or_default().push(Tag {
                id: tag_id,
                name: name.to_string(),
                color: None,
            });
        }
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PreferenceStore for FakeStore {
    async fn blacklist(&self, user_id: &str) -> Result<HashSet<String>, StoreError> {
        self.check()?;
        Ok(self.blacklists.get(user_id).cloned().unwrap_or_default())
    }

    async fn favorites(&self, user_id: &str) -> Result<HashSet<String>, StoreError> {
        self.check()?;
        Ok(self.favorites.get(user_id).cloned().unwrap_or_default())
    }

    async fn tagged_restaurants(&self, tag_ids: &[i64]) -> Result<HashSet<String>, StoreError> {
        self.check()?;
        Ok(tag_ids
            .iter()
            .filter_map(|id| self.tagged.get(id))
            .flatten()
            .cloned()
            .collect())
    }

    async fn tags_for(&self, external_ids: &[String]) -> Result<HashMap<String, Vec<Tag>>, StoreError> {
        *self.tag_lookups.lock().unwrap() += 1;
        self.check()?;
        Ok(external_ids
            .iter()
            .filter_map(|id| self.tags.get(id).map(|tags| (id.clone(), tags.clone())))
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.check().map(|_| true)
    }
}

pub struct Harness {
    pub search: Arc<FakeSearch>,
    pub details: Arc<FakeDetails>,
    pub store: Arc<FakeStore>,
    pub pipeline: RecommendationPipeline,
}

pub fn harness(search: FakeSearch, details: FakeDetails, store: FakeStore) -> Harness {
    let search = Arc::new(search);
    let details = Arc::new(details);
    let store = Arc::new(store);
    let pipeline = RecommendationPipeline::new(
        search.clone(),
        details.clone(),
        store.clone(),
        CandidateSourcer::default(),
    );

    Harness {
        search,
        details,
        store,
        pipeline,
    }
}

pub fn result_ids(results: &[forkcast::EnrichedCandidate]) -> Vec<String> {
    results.iter().map(|r| r.external_id().to_string()).collect()
}
