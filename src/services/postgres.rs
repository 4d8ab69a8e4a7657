use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::models::Tag;
use crate::services::ports::{PreferenceStore, StoreError};

/// PostgreSQL-backed preference store
///
/// Holds each user's blacklisted and favorite restaurants plus the
/// user-curated tags linked to restaurants by provider external id.
pub struct PostgresPreferenceStore {
    pool: PgPool,
}

impl PostgresPreferenceStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL preference store");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    async fn restaurant_ids_for_user(&self, query: &str, user_id: &str) -> Result<HashSet<String>, StoreError> {
        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let ids: HashSet<String> = rows.iter().map(|row| row.get("restaurant_id")).collect();
        Ok(ids)
    }
}

#[async_trait]
impl PreferenceStore for PostgresPreferenceStore {
    async fn blacklist(&self, user_id: &str) -> Result<HashSet<String>, StoreError> {
        let query = r#"
            SELECT restaurant_id
            FROM blacklisted_restaurants
            WHERE user_id = $1
        "#;

        let ids = self.restaurant_ids_for_user(query, user_id).await?;
        tracing::debug!("User {} has {} blacklisted restaurants", user_id, ids.len());
        Ok(ids)
    }

    async fn favorites(&self, user_id: &str) -> Result<HashSet<String>, StoreError> {
        let query = r#"
            SELECT restaurant_id
            FROM favorite_restaurants
            WHERE user_id = $1
        "#;

        self.restaurant_ids_for_user(query, user_id).await
    }

    async fn tagged_restaurants(&self, tag_ids: &[i64]) -> Result<HashSet<String>, StoreError> {
        if tag_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let query = r#"
            SELECT DISTINCT restaurant_id
            FROM restaurant_tags
            WHERE tag_id = ANY($1)
        "#;

        let rows = sqlx::query(query).bind(tag_ids).fetch_all(&self.pool).await?;

        let ids: HashSet<String> = rows.iter().map(|row| row.get("restaurant_id")).collect();
        Ok(ids)
    }

    async fn tags_for(&self, external_ids: &[String]) -> Result<HashMap<String, Vec<Tag>>, StoreError> {
        if external_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = r#"
            SELECT rt.restaurant_id, t.id, t.name, t.color
            FROM restaurant_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.restaurant_id = ANY($1)
            ORDER BY t.id
        "#;

        let rows = sqlx::query(query).bind(external_ids).fetch_all(&self.pool).await?;

        let mut tags: HashMap<String, Vec<Tag>> = HashMap::new();
        for row in &rows {
            let restaurant_id: String = row.get("restaurant_id");
            tags.entry(restaurant_id).or_default().push(Tag {
                id: row.get("id"),
                name: row.get("name"),
                color: row.get("color"),
            });
        }

        Ok(tags)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
