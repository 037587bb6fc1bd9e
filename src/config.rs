//! Source configuration
//!
//! The host supplies `{ "app_api_key": "...", "region": "US" | "EU" }`.
//! Everything else has a default and only needs to be set to tune paging
//! or the HTTP client.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::region::Region;
use crate::types::{BackoffType, SyncMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Largest page size the App API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Source configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// App API key (sent as a bearer token)
    pub app_api_key: String,

    /// Region code, `US` or `EU`
    pub region: String,

    /// Records per page for token-paged streams
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched in one pagination cycle
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Replaces the regional base URL (proxies, test servers)
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP client tuning
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_page_size() -> u32 {
    10
}

fn default_max_pages() -> u32 {
    10_000
}

impl SourceConfig {
    /// Create a config with defaults for everything but the credentials
    pub fn new(app_api_key: impl Into<String>, region: Region) -> Self {
        Self {
            app_api_key: app_api_key.into(),
            region: region.code().to_string(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            base_url: None,
            http: HttpConfig::default(),
        }
    }

    /// Parse and validate a config from the host's JSON mapping
    pub fn from_value(value: &Value) -> Result<Self> {
        for field in ["app_api_key", "region"] {
            if value.get(field).map_or(true, Value::is_null) {
                return Err(Error::missing_field(field));
            }
        }

        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file (`.yaml`/`.yml` as YAML, anything else as JSON)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let value: Value = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        Self::from_value(&value)
    }

    /// Check every field that can be checked without a network call
    pub fn validate(&self) -> Result<()> {
        if self.app_api_key.trim().is_empty() {
            return Err(Error::missing_field("app_api_key"));
        }

        self.region()?;

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        if self.max_pages == 0 {
            return Err(Error::invalid_value("max_pages", "must be at least 1"));
        }

        self.base_url()?;
        Ok(())
    }

    /// Parsed region
    pub fn region(&self) -> Result<Region> {
        self.region.parse()
    }

    /// Base URL for all requests, always ending with `/`
    pub fn base_url(&self) -> Result<Url> {
        let region = self.region()?;
        let raw = self.base_url.as_deref().unwrap_or(region.base_url());
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Ok(Url::parse(&normalized)?)
    }

    /// HTTP client settings derived from this config
    pub fn client_config(&self) -> HttpClientConfig {
        self.http.client_config()
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("app_api_key", &"<redacted>")
            .field("region", &self.region)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("base_url", &self.base_url)
            .field("http", &self.http)
            .finish()
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Requests per second; `null` disables rate limiting
    #[serde(default = "default_rps")]
    pub requests_per_second: Option<u32>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffConfig::default(),
            requests_per_second: default_rps(),
        }
    }
}

impl HttpConfig {
    /// Build the HTTP client configuration
    pub fn client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            );

        let builder = match self.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

// App API allows 10 requests per second
fn default_rps() -> Option<u32> {
    Some(10)
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Discovered catalog (available streams)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<CatalogStream>,
}

/// Stream in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStream {
    /// Stream name
    pub name: String,

    /// JSON schema for the stream
    #[serde(default)]
    pub json_schema: Value,

    /// Supported sync modes
    #[serde(default)]
    pub supported_sync_modes: Vec<SyncMode>,

    /// Source-defined primary key
    #[serde(default)]
    pub source_defined_primary_key: Option<Vec<Vec<String>>>,
}

/// Configured catalog (selected streams for sync)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    /// Selected streams
    pub streams: Vec<ConfiguredStream>,
}

impl ConfiguredCatalog {
    /// Select every stream of a discovered catalog
    pub fn select_all(catalog: &Catalog) -> Self {
        Self {
            streams: catalog
                .streams
                .iter()
                .cloned()
                .map(ConfiguredStream::new)
                .collect(),
        }
    }

    /// Whether a stream is selected
    pub fn contains(&self, name: &str) -> bool {
        self.streams.iter().any(|s| s.stream.name == name)
    }
}

/// Configured stream for sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// Stream reference
    pub stream: CatalogStream,

    /// Selected sync mode
    #[serde(default)]
    pub sync_mode: SyncMode,
}

impl ConfiguredStream {
    /// Configure a stream for full refresh
    pub fn new(stream: CatalogStream) -> Self {
        Self {
            stream,
            sync_mode: SyncMode::FullRefresh,
        }
    }
}
