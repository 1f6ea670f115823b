//! Configuration types for quick-blog

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// Environment variable overriding [`SourceConfig::base_url`]
pub const ENV_SOURCE_URL: &str = "QUICK_BLOG_SOURCE_URL";
/// Environment variable overriding [`PersistenceConfig::database_path`]
pub const ENV_DATABASE_PATH: &str = "QUICK_BLOG_DATABASE_PATH";
/// Environment variable overriding [`ApiConfig::bind_address`]
pub const ENV_BIND_ADDRESS: &str = "QUICK_BLOG_BIND_ADDRESS";
/// Environment variable overriding [`StoreConfig::fallback_to_sample_data`]
pub const ENV_FALLBACK_TO_SAMPLE_DATA: &str = "QUICK_BLOG_FALLBACK_TO_SAMPLE_DATA";

/// Top-level configuration
///
/// Every field has a sensible default, so `Config::default()` talks to the
/// public JSONPlaceholder API and persists snapshots to `./quick-blog.db`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Article source (upstream REST endpoint)
    #[serde(default)]
    pub source: SourceConfig,

    /// Article store policies
    #[serde(default)]
    pub store: StoreConfig,

    /// Pagination and search view settings
    #[serde(default)]
    pub view: ViewConfig,

    /// Caller retry policy for fetches
    #[serde(default)]
    pub retry: RetryConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// REST API server
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Default configuration with environment overrides applied
    ///
    /// Unset variables leave the default in place. Unparseable values are
    /// reported as [`Error::Config`].
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply environment overrides on top of the current values
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_SOURCE_URL) {
            self.source.base_url = url;
        }
        if let Ok(path) = std::env::var(ENV_DATABASE_PATH) {
            self.persistence.database_path = PathBuf::from(path);
        }
        if let Ok(addr) = std::env::var(ENV_BIND_ADDRESS) {
            self.api.bind_address = addr.parse().map_err(|e| {
                Error::config(
                    "api.bind_address",
                    format!("invalid {ENV_BIND_ADDRESS} '{addr}': {e}"),
                )
            })?;
        }
        if let Ok(flag) = std::env::var(ENV_FALLBACK_TO_SAMPLE_DATA) {
            self.store.fallback_to_sample_data = parse_flag(&flag).ok_or_else(|| {
                Error::config(
                    "store.fallback_to_sample_data",
                    format!("invalid {ENV_FALLBACK_TO_SAMPLE_DATA} '{flag}': expected true/false"),
                )
            })?;
        }
        Ok(())
    }

    /// Check settings that would make the views or the fetcher unusable
    pub fn validate(&self) -> Result<()> {
        if self.view.page_size == 0 {
            return Err(Error::config("view.page_size", "page size must be at least 1"));
        }
        if self.view.max_pages_shown == 0 {
            return Err(Error::config(
                "view.max_pages_shown",
                "at least one page label must be shown",
            ));
        }
        if self.source.timeout.is_zero() {
            return Err(Error::config("source.timeout", "timeout must be positive"));
        }
        url::Url::parse(&self.source.base_url).map_err(|e| {
            Error::config(
                "source.base_url",
                format!("invalid base url '{}': {e}", self.source.base_url),
            )
        })?;
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Upstream article source configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the article API; articles live under `<base_url>/posts`
    /// (default: "https://jsonplaceholder.typicode.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum wait for one request, body included (default: 10 seconds)
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// How related articles are picked for a detail page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedPolicy {
    /// Random sample of the other articles (default)
    #[default]
    Random,
    /// The first other articles in collection order
    InOrder,
}

/// Article store configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Substitute the built-in sample set when a fetch returns zero articles
    /// (default: false, the store stays empty)
    #[serde(default)]
    pub fallback_to_sample_data: bool,

    /// Number of related articles on a detail page (default: 3)
    #[serde(default = "default_related_count")]
    pub related_count: usize,

    /// Related article selection policy
    #[serde(default)]
    pub related_policy: RelatedPolicy,

    /// Fixed seed for random related selection (None = seeded from entropy)
    #[serde(default)]
    pub related_seed: Option<u64>,

    /// Key of the persisted snapshot (default: "blog-storage")
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fallback_to_sample_data: false,
            related_count: default_related_count(),
            related_policy: RelatedPolicy::default(),
            related_seed: None,
            snapshot_key: default_snapshot_key(),
        }
    }
}

/// Pagination and search view configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Articles per page (default: 8)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum consecutive page labels around the current page (default: 5)
    #[serde(default = "default_max_pages_shown")]
    pub max_pages_shown: usize,

    /// Input inactivity before a search runs (default: 300 ms)
    #[serde(default = "default_search_debounce", with = "millis_serde")]
    pub search_debounce: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages_shown: default_max_pages_shown(),
            search_debounce: default_search_debounce(),
        }
    }
}

/// Retry configuration with exponential backoff
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

/// Where the store snapshot lives
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotBackend {
    /// SQLite key/value table at `database_path` (default)
    #[default]
    Sqlite,
    /// Process memory only; nothing survives a restart
    Memory,
}

/// Snapshot persistence configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Snapshot backend
    #[serde(default)]
    pub backend: SnapshotBackend,

    /// Database path (default: "./quick-blog.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: SnapshotBackend::default(),
            database_path: default_database_path(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:6790)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com".into()
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("quick-blog/", env!("CARGO_PKG_VERSION")).into()
}

fn default_related_count() -> usize {
    crate::store::DEFAULT_RELATED_COUNT
}

fn default_snapshot_key() -> String {
    "blog-storage".into()
}

fn default_page_size() -> usize {
    8
}

fn default_max_pages_shown() -> usize {
    5
}

fn default_search_debounce() -> Duration {
    Duration::from_millis(300)
}

fn default_max_attempts() -> u32 {
    2
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./quick-blog.db")
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6790))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
