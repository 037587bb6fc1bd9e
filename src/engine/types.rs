//! Engine types
//!
//! Shared context for all streams of one source, and run statistics.

use crate::auth::Authenticator;
use crate::config::SourceConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::region::Region;
use futures::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Lazily produced records of one stream
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<Value>> + Send>>;

/// Everything the streams of one source share
///
/// Streams hold it behind an `Arc`. Only the page counter changes after it
/// is built.
#[derive(Debug)]
pub struct SourceContext {
    /// Authenticated HTTP client
    pub client: HttpClient,
    /// Region the base URL was derived from
    pub region: Region,
    /// Base URL, ending with `/`
    pub base_url: Url,
    /// Records per page for token-paged streams
    pub page_size: u32,
    /// Upper bound on pages per pagination cycle
    pub max_pages: u32,
    /// Pages fetched by every stream built on this context
    pages: AtomicU64,
}

impl SourceContext {
    /// Validate the config and build the shared authenticator and client
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        config.validate()?;

        let authenticator = Authenticator::bearer(&config.app_api_key);
        let client = HttpClient::with_auth(config.client_config(), authenticator)?;

        Ok(Self {
            client,
            region: config.region()?,
            base_url: config.base_url()?,
            page_size: config.page_size,
            max_pages: config.max_pages,
            pages: AtomicU64::new(0),
        })
    }

    /// Count one successfully fetched page
    pub fn record_page(&self) {
        self.pages.fetch_add(1, Ordering::Relaxed);
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages.load(Ordering::Relaxed)
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Total pages fetched
    pub pages_fetched: u64,
    /// Errors encountered
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Add pages
    pub fn add_pages(&mut self, count: u64) {
        self.pages_fetched += count;
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// One-line summary logged when a sync ends
    pub fn summary(&self) -> String {
        format!(
            "{} records from {} streams in {} pages, {} errors, {}ms",
            self.records_synced, self.streams_synced, self.pages_fetched, self.errors, self.duration_ms
        )
    }
}
