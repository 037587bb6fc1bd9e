//! Pagination strategy implementations

use super::types::{extract_field, NextPage, PaginationState, Paginator};
use crate::types::OptionStringExt;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

// ============================================================================
// Token Pagination
// ============================================================================

/// Continuation-token pagination
///
/// The first request sends only the page size. Each response may carry a
/// token; while it is present and non-empty the next request sends it
/// back alongside the page size.
#[derive(Debug, Clone)]
pub struct TokenPaginator {
    /// Dot path of the token in the response body
    pub token_path: String,
    /// Query parameter that carries the token back
    pub token_param: String,
    /// Query parameter for the page size
    pub limit_param: String,
    /// Records per page
    pub page_size: u32,
}

impl TokenPaginator {
    /// Create a new token paginator
    pub fn new(
        token_path: impl Into<String>,
        token_param: impl Into<String>,
        limit_param: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            token_path: token_path.into(),
            token_param: token_param.into(),
            limit_param: limit_param.into(),
            page_size,
        }
    }
}

impl Paginator for TokenPaginator {
    fn initial_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert(self.limit_param.clone(), self.page_size.to_string());
        params
    }

    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);
        state.next_page();

        let Some(token) = extract_field(body, &self.token_path).none_if_empty() else {
            return NextPage::Done;
        };

        // A server repeating its last token would page forever
        if state.cursor.as_deref() == Some(token.as_str()) {
            warn!("Continuation token '{token}' repeated, stopping pagination");
            return NextPage::Done;
        }

        state.set_cursor(token.clone());

        let mut params = self.initial_params();
        params.insert(self.token_param.clone(), token);
        NextPage::with_params(params)
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn initial_params(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn process_response(
        &self,
        _body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);
        state.next_page();
        NextPage::Done
    }
}
