//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use super::strategies::{NoPaginator, TokenPaginator};
use serde_json::Value;
use std::collections::BTreeMap;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these query parameters
    Continue {
        /// Query parameters for the next request (replaces the previous set)
        query_params: BTreeMap<String, String>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(query_params: BTreeMap<String, String>) -> Self {
        Self::Continue { query_params }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Configuration for pagination behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaginationConfig {
    /// One request satisfies the resource
    #[default]
    None,

    /// Continuation-token pagination
    Token {
        /// Dot path of the token in the response body
        token_path: String,
        /// Query parameter that carries the token back
        token_param: String,
        /// Query parameter for the page size
        limit_param: String,
        /// Records per page
        page_size: u32,
    },
}

impl PaginationConfig {
    /// Token pagination the way the App API does it: `next` -> `start`, `limit`
    pub fn token(page_size: u32) -> Self {
        Self::Token {
            token_path: "next".to_string(),
            token_param: "start".to_string(),
            limit_param: "limit".to_string(),
            page_size,
        }
    }

    /// Build the paginator for this config
    pub fn build(&self) -> Box<dyn Paginator> {
        match self {
            Self::None => Box::new(NoPaginator),
            Self::Token {
                token_path,
                token_param,
                limit_param,
                page_size,
            } => Box::new(TokenPaginator::new(
                token_path.clone(),
                token_param.clone(),
                limit_param.clone(),
                *page_size,
            )),
        }
    }
}

/// Tracks pagination state during one pagination cycle
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages processed so far
    pub page: u32,
    /// Last continuation token received
    pub cursor: Option<String>,
    /// Total records fetched so far
    pub total_fetched: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the first request
    fn initial_params(&self) -> BTreeMap<String, String>;

    /// Process a response and determine if there's a next page
    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage;
}

/// Read a scalar at a dot path (`next`, `meta.next`) as a string
///
/// Strings are returned as-is and numbers are formatted; anything else
/// (missing, null, objects, arrays, booleans) yields `None`.
pub fn extract_field(value: &Value, path: &str) -> Option<String> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
