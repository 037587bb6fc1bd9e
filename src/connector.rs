//! Connector trait and the Customer.io source
//!
//! `CustomerioSource` ties configuration, the stream registry and the
//! engine together behind the `Connector` trait.

use crate::config::{Catalog, CatalogStream, ConfiguredCatalog, SourceConfig};
use crate::engine::{RecordSource, SourceContext, SyncStats};
use crate::error::{Error, Result};
use crate::streams::{self, DESCRIPTORS};
use crate::types::{LogLevel, SyncMode};
use async_stream::stream;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Message reported when the connection check fails
pub fn connection_error_message(error: &Error) -> String {
    format!(
        "Connection check failed with error: {error}.\n\
         Check if the workers IP address is whitelisted in the CustomerIO\n\
         console or if acces token is set up correctly.\n\
         Also you may have configured the wrong region."
    )
}

// ============================================================================
// Messages
// ============================================================================

/// Messages emitted during read operations
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// One record, verbatim
    Record {
        /// Stream name
        stream: String,
        /// Record data
        data: Value,
        /// Timestamp when the record was emitted
        emitted_at: DateTime<Utc>,
    },

    /// Log message
    Log {
        /// Log level
        level: LogLevel,
        /// Log message
        message: String,
    },
}

impl Message {
    /// Create a record message
    pub fn record(stream: impl Into<String>, data: Value) -> Self {
        Self::Record {
            stream: stream.into(),
            data,
            emitted_at: Utc::now(),
        }
    }

    /// Create a log message
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    /// Create an info log message
    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    /// Create a warning log message
    pub fn warn(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Warn, message)
    }

    /// Create an error log message
    pub fn error(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Error, message)
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a log message
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log { .. })
    }

    /// Wire form, one JSON object per line
    pub fn to_json(&self) -> Value {
        match self {
            Self::Record {
                stream,
                data,
                emitted_at,
            } => json!({
                "type": "RECORD",
                "record": {
                    "stream": stream,
                    "data": data,
                    "emitted_at": emitted_at.timestamp_millis()
                }
            }),
            Self::Log { level, message } => json!({
                "type": "LOG",
                "log": {
                    "level": level.as_str(),
                    "message": message
                }
            }),
        }
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Type alias for the message stream returned by read()
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<Message>> + Send>>;

/// Core trait that all connectors implement
#[async_trait]
pub trait Connector: Send + Sync {
    /// Tests if credentials and configuration are valid
    async fn check(&self, config: &Value) -> Result<CheckResult>;

    /// Lists available streams from the source
    async fn discover(&self, config: &Value) -> Result<Catalog>;

    /// Reads the selected streams, one after another
    ///
    /// The first failing stream ends the message stream with its error.
    async fn read(
        &self,
        config: &Value,
        catalog: &ConfiguredCatalog,
        cancel: CancellationToken,
    ) -> Result<MessageStream>;
}

// ============================================================================
// Customer.io Source
// ============================================================================

/// The Customer.io App API source
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerioSource;

impl CustomerioSource {
    /// Create the source
    pub fn new() -> Self {
        Self
    }

    /// Build all nine streams, in registry order
    ///
    /// Fails on a missing api key, an unknown region or invalid tuning keys.
    pub fn streams(&self, config: &Value) -> Result<Vec<Arc<dyn RecordSource>>> {
        let config = SourceConfig::from_value(config)?;
        self.streams_for(&config)
    }

    /// Build all nine streams from a parsed config
    pub fn streams_for(&self, config: &SourceConfig) -> Result<Vec<Arc<dyn RecordSource>>> {
        let context = Arc::new(SourceContext::from_config(config)?);
        debug!("Building streams against {}", context.base_url);
        streams::build_streams(&context)
    }

    /// Pull at most one Activities record
    ///
    /// An empty but well-formed first page is a success.
    pub async fn try_check(&self, config: &Value) -> Result<()> {
        let config = SourceConfig::from_value(config)?;
        let context = Arc::new(SourceContext::from_config(&config)?);
        let activities = streams::build_streams(&context)?
            .into_iter()
            .find(|s| s.name() == "activities")
            .ok_or_else(|| Error::StreamNotFound {
                stream: "activities".to_string(),
            })?;

        let mut records = activities.read_records(CancellationToken::new());
        match records.next().await {
            Some(Err(e)) => Err(e),
            Some(Ok(_)) | None => Ok(()),
        }
    }

    /// Check connectivity, reporting failures with the user-facing message
    pub async fn check_connection(&self, config: &Value) -> (bool, Option<String>) {
        match self.try_check(config).await {
            Ok(()) => (true, None),
            Err(e) => {
                warn!("Connection check failed: {}", e);
                (false, Some(connection_error_message(&e)))
            }
        }
    }

    /// Catalog of all streams; needs no network access
    pub fn catalog(&self) -> Catalog {
        Catalog {
            streams: DESCRIPTORS
                .iter()
                .map(|d| CatalogStream {
                    name: d.name.to_string(),
                    json_schema: json!({"type": "object"}),
                    supported_sync_modes: vec![SyncMode::FullRefresh],
                    source_defined_primary_key: Some(vec![vec![d.primary_key.to_string()]]),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Connector for CustomerioSource {
    async fn check(&self, config: &Value) -> Result<CheckResult> {
        let (success, message) = self.check_connection(config).await;
        Ok(CheckResult { success, message })
    }

    async fn discover(&self, config: &Value) -> Result<Catalog> {
        SourceConfig::from_value(config)?;
        Ok(self.catalog())
    }

    async fn read(
        &self,
        config: &Value,
        catalog: &ConfiguredCatalog,
        cancel: CancellationToken,
    ) -> Result<MessageStream> {
        for configured in &catalog.streams {
            if streams::descriptor(&configured.stream.name).is_none() {
                return Err(Error::StreamNotFound {
                    stream: configured.stream.name.clone(),
                });
            }
        }

        let config = SourceConfig::from_value(config)?;
        let context = Arc::new(SourceContext::from_config(&config)?);
        let selected: Vec<Arc<dyn RecordSource>> = streams::build_streams(&context)?
            .into_iter()
            .filter(|s| catalog.contains(s.name()))
            .collect();

        Ok(Box::pin(stream! {
            let started = Instant::now();
            let mut stats = SyncStats::new();

            for source in selected {
                let name = source.name().to_string();
                let mut records = source.read_records(cancel.clone());
                let mut count = 0usize;

                while let Some(record) = records.next().await {
                    match record {
                        Ok(data) => {
                            count += 1;
                            yield Ok(Message::record(&name, data));
                        }
                        Err(e) => {
                            stats.add_records(count);
                            stats.add_pages(context.pages_fetched());
                            stats.add_error();
                            stats.set_duration(started.elapsed().as_millis() as u64);
                            warn!("Stream {} failed after {} records: {}", name, count, e);
                            warn!("Sync failed: {}", stats.summary());
                            yield Err(e);
                            return;
                        }
                    }
                }

                stats.add_records(count);
                stats.add_stream();
                info!("Finished stream {}: {} records", name, count);
            }

            stats.add_pages(context.pages_fetched());
            stats.set_duration(started.elapsed().as_millis() as u64);
            info!("Sync complete: {}", stats.summary());
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfiguredStream;
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{bearer_token, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Value {
        json!({
            "app_api_key": "secret-key",
            "region": "US",
            "base_url": format!("{}/v1/api", server.uri()),
            "http": {"max_retries": 0, "requests_per_second": null}
        })
    }

    fn selected(names: &[&str]) -> ConfiguredCatalog {
        let catalog = CustomerioSource::new().catalog();
        ConfiguredCatalog {
            streams: catalog
                .streams
                .into_iter()
                .filter(|s| names.contains(&s.name.as_str()))
                .map(ConfiguredStream::new)
                .collect(),
        }
    }

    #[test]
    fn test_check_result() {
        assert_eq!(CheckResult::success().message, None);

        let failed = CheckResult::failure("nope");
        assert!(!failed.success);
        assert_eq!(failed.message.as_deref(), Some("nope"));
    }

    #[test]
    fn test_connection_error_message() {
        let message = connection_error_message(&Error::http_status(401, "Unauthorized"));
        assert!(message.starts_with("Connection check failed with error: "));
        assert!(message.contains("401"));
        assert!(message.ends_with("Also you may have configured the wrong region."));
        assert_eq!(message.lines().count(), 4);
    }

    #[test]
    fn test_message_json() {
        let record = Message::record("campaigns", json!({"id": 1}));
        assert!(record.is_record());
        let wire = record.to_json();
        assert_eq!(wire["type"], "RECORD");
        assert_eq!(wire["record"]["stream"], "campaigns");
        assert_eq!(wire["record"]["data"], json!({"id": 1}));
        assert!(wire["record"]["emitted_at"].is_i64());

        let log = Message::warn("careful");
        assert!(log.is_log());
        assert_eq!(
            log.to_json(),
            json!({"type": "LOG", "log": {"level": "WARN", "message": "careful"}})
        );
    }

    #[test]
    fn test_catalog() {
        let catalog = CustomerioSource::new().catalog();
        assert_eq!(catalog.streams.len(), 9);
        for stream in &catalog.streams {
            assert_eq!(
                stream.source_defined_primary_key,
                Some(vec![vec!["id".to_string()]])
            );
            assert_eq!(stream.supported_sync_modes, vec![SyncMode::FullRefresh]);
        }
    }

    #[test]
    fn test_streams_requires_credentials() {
        let source = CustomerioSource::new();

        assert!(matches!(
            source.streams(&json!({"region": "US"})),
            Err(Error::MissingConfigField { .. })
        ));
        assert!(matches!(
            source.streams(&json!({"app_api_key": "k"})),
            Err(Error::MissingConfigField { .. })
        ));

        let err = source
            .streams(&json!({"app_api_key": "k", "region": "APAC"}))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Region must be set to US or EU."));
    }

    #[test]
    fn test_streams_in_order() {
        let streams = CustomerioSource::new()
            .streams(&json!({"app_api_key": "k", "region": "EU"}))
            .unwrap();
        let names: Vec<_> = streams.iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names.first().map(String::as_str), Some("activities"));
        assert_eq!(names.last().map(String::as_str), Some("campaign_actions"));
        assert_eq!(names.len(), 9);
    }

    #[tokio::test]
    async fn test_check_succeeds_on_empty_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/api/activities"))
            .and(bearer_token("secret-key"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"activities": []})))
            .expect(1)
            .mount(&server)
            .await;

        let source = CustomerioSource::new();
        let (success, message) = source.check_connection(&config_for(&server)).await;

        assert!(success);
        assert_eq!(message, None);
    }

    #[tokio::test]
    async fn test_check_pulls_one_record_only() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/api/activities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "activities": [{"id": "1"}, {"id": "2"}],
                "next": "more"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = CustomerioSource::new()
            .check(&config_for(&server))
            .await
            .unwrap();
        assert_eq!(result, CheckResult::success());
    }

    #[tokio::test]
    async fn test_check_fails_on_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/api/activities"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized request"))
            .mount(&server)
            .await;

        let source = CustomerioSource::new();
        let (success, message) = source.check_connection(&config_for(&server)).await;

        assert!(!success);
        let message = message.unwrap();
        assert!(message.starts_with("Connection check failed with error: "));
        assert!(message.contains("401"));

        let err = source.try_check(&config_for(&server)).await.unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_check_fails_on_bad_region() {
        let (success, message) = CustomerioSource::new()
            .check_connection(&json!({"app_api_key": "k", "region": "ASIA"}))
            .await;

        assert!(!success);
        assert!(message.unwrap().contains("Region must be set to US or EU."));
    }

    #[tokio::test]
    async fn test_discover_validates_config() {
        let source = CustomerioSource::new();

        let catalog = source
            .discover(&json!({"app_api_key": "k", "region": "US"}))
            .await
            .unwrap();
        assert_eq!(catalog.streams[0].name, "activities");

        assert!(source.discover(&json!({})).await.is_err());
    }

    #[tokio::test]
    async fn test_read_selected_streams() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/api/campaigns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "campaigns": [{"id": 1}, {"id": 2}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/api/activities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"activities": []})))
            .expect(0)
            .mount(&server)
            .await;

        let messages: Vec<Message> = CustomerioSource::new()
            .read(
                &config_for(&server),
                &selected(&["campaigns"]),
                CancellationToken::new(),
            )
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        let data: Vec<_> = messages
            .iter()
            .map(|m| match m {
                Message::Record { stream, data, .. } => (stream.as_str(), data["id"].clone()),
                Message::Log { .. } => panic!("unexpected log message"),
            })
            .collect();
        assert_eq!(data, vec![("campaigns", json!(1)), ("campaigns", json!(2))]);
    }

    #[tokio::test]
    async fn test_read_unknown_stream() {
        let mut catalog = selected(&["campaigns"]);
        catalog.streams[0].stream.name = "customers".to_string();

        let result = CustomerioSource::new()
            .read(
                &json!({"app_api_key": "k", "region": "US"}),
                &catalog,
                CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(Error::StreamNotFound { .. })));
    }

    #[tokio::test]
    async fn test_read_stops_at_first_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/api/broadcasts"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/api/campaigns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"campaigns": []})))
            .expect(0)
            .mount(&server)
            .await;

        let mut messages = CustomerioSource::new()
            .read(
                &config_for(&server),
                &selected(&["broadcasts", "campaigns"]),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(matches!(
            messages.next().await,
            Some(Err(Error::HttpStatus { status: 403, .. }))
        ));
        assert!(messages.next().await.is_none());
    }
}
