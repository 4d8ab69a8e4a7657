use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub search: ProviderSettings,
    pub detail: ProviderSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub sourcing: SourcingSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Connection settings for an external place provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Client-side request rate; 0 disables throttling
    #[serde(default)]
    pub requests_per_second: u32,
}

fn default_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Fan-out limits for candidate discovery
#[derive(Debug, Clone, Deserialize)]
pub struct SourcingSettings {
    #[serde(default = "default_pages_per_category")]
    pub pages_per_category: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_categories")]
    pub default_categories: Vec<String>,
}

impl Default for SourcingSettings {
    fn default() -> Self {
        Self {
            pages_per_category: default_pages_per_category(),
            page_size: default_page_size(),
            default_categories: default_categories(),
        }
    }
}

fn default_pages_per_category() -> u32 { crate::core::sourcer::DEFAULT_PAGES_PER_CATEGORY }
fn default_page_size() -> u32 { crate::core::sourcer::DEFAULT_PAGE_SIZE }
fn default_categories() -> Vec<String> { vec!["restaurant".to_string()] }

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_result_budget")]
    pub default_result_budget: usize,
    #[serde(default = "default_max_result_budget")]
    pub max_result_budget: usize,
    #[serde(default = "default_radius_meters")]
    pub default_radius_meters: u32,
    #[serde(default = "default_max_radius_meters")]
    pub max_radius_meters: u32,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_result_budget: default_result_budget(),
            max_result_budget: default_max_result_budget(),
            default_radius_meters: default_radius_meters(),
            max_radius_meters: default_max_radius_meters(),
        }
    }
}

fn default_result_budget() -> usize { 10 }
fn default_max_result_budget() -> usize { 30 }
fn default_radius_meters() -> u32 { 1000 }
fn default_max_radius_meters() -> u32 { 20000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FORKCAST_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FORKCAST_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FORKCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FORKCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }
}

/// Apply the conventional unprefixed variables (`DATABASE_URL`, provider keys, log level)
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(api_key) = env::var("SEARCH_API_KEY") {
        builder = builder.set_override("search.api_key", api_key)?;
    }
    if let Ok(api_key) = env::var("DETAIL_API_KEY") {
        builder = builder.set_override("detail.api_key", api_key)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}
