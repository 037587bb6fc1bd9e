// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # customerio-source
//!
//! Full-refresh extraction of the Customer.io App API: activities,
//! broadcasts, campaigns and their per-item metrics, metric links and
//! actions.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use customerio_source::{Connector, ConfiguredCatalog, CustomerioSource, Result};
//! use futures::StreamExt;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = CustomerioSource::new();
//!     let config = serde_json::json!({ "app_api_key": "...", "region": "US" });
//!
//!     let (ok, message) = source.check_connection(&config).await;
//!     assert!(ok, "{message:?}");
//!
//!     let catalog = ConfiguredCatalog::select_all(&source.discover(&config).await?);
//!     let mut messages = source.read(&config, &catalog, CancellationToken::new()).await?;
//!     while let Some(msg) = messages.next().await {
//!         println!("{}", msg?.to_json());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  CustomerioSource: check() · discover() · read(catalog)      │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ streams::DESCRIPTORS
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │  engine: HttpStream (own endpoint) · ChildStream (per parent)│
//! └──────┬──────────────┬───────────────┬───────────────┬────────┘
//!        │              │               │               │
//!   http + auth     pagination       decode        partition
//!   retry, rate     next → start     envelope /    parent id →
//!   limit, bearer   limit            object        path template
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Regions and their base URLs
pub mod region;

/// Source configuration and catalogs
pub mod config;

/// Bearer authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Response decoders
pub mod decode;

/// Path templates
pub mod template;

/// Parent-child partition routing
pub mod partition;

/// Resource descriptors and the stream registry
pub mod streams;

/// Stream execution engine
pub mod engine;

/// Connector trait and the Customer.io source
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{Catalog, ConfiguredCatalog, SourceConfig};
pub use connector::{CheckResult, Connector, CustomerioSource, Message, MessageStream};
pub use engine::{RecordSource, RecordStream};
pub use error::{Error, Result};
pub use region::Region;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
