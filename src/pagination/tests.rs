//! Tests for pagination module

use super::*;
use serde_json::json;
use std::collections::BTreeMap;

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// NextPage Tests
// ============================================================================

#[test]
fn test_next_page_variants() {
    let next = NextPage::with_params(params(&[("start", "abc")]));
    assert!(next.is_continue());
    assert!(!next.is_done());

    assert!(NextPage::Done.is_done());
    assert!(!NextPage::Done.is_continue());
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_pagination_state_mutations() {
    let mut state = PaginationState::new();
    assert_eq!(state.page, 0);
    assert!(state.cursor.is_none());

    state.next_page();
    state.set_cursor("cursor123".to_string());
    state.add_fetched(10);

    assert_eq!(state.page, 1);
    assert_eq!(state.cursor.as_deref(), Some("cursor123"));
    assert_eq!(state.total_fetched, 10);
}

// ============================================================================
// extract_field Tests
// ============================================================================

#[test]
fn test_extract_field() {
    let body = json!({"next": "tok", "meta": {"next": 42}, "nothing": null, "list": [1]});

    assert_eq!(extract_field(&body, "next"), Some("tok".to_string()));
    assert_eq!(extract_field(&body, "$.next"), Some("tok".to_string()));
    assert_eq!(extract_field(&body, "meta.next"), Some("42".to_string()));
    assert_eq!(extract_field(&body, "nothing"), None);
    assert_eq!(extract_field(&body, "list"), None);
    assert_eq!(extract_field(&body, "missing"), None);
    assert_eq!(extract_field(&json!([1, 2]), "next"), None);
}

// ============================================================================
// TokenPaginator Tests
// ============================================================================

#[test]
fn test_token_initial_params_only_limit() {
    let paginator = TokenPaginator::new("next", "start", "limit", 10);
    assert_eq!(paginator.initial_params(), params(&[("limit", "10")]));
}

#[test]
fn test_token_continues_with_start() {
    let paginator = TokenPaginator::new("next", "start", "limit", 25);
    let mut state = PaginationState::new();

    let next = paginator.process_response(&json!({"activities": [], "next": "abc"}), 25, &mut state);

    assert_eq!(
        next,
        NextPage::with_params(params(&[("limit", "25"), ("start", "abc")]))
    );
    assert_eq!(state.cursor.as_deref(), Some("abc"));
    assert_eq!(state.total_fetched, 25);
    assert_eq!(state.page, 1);
}

#[test]
fn test_token_stops_when_absent_empty_or_null() {
    let paginator = TokenPaginator::new("next", "start", "limit", 10);

    for body in [json!({}), json!({"next": ""}), json!({"next": null})] {
        let mut state = PaginationState::new();
        let next = paginator.process_response(&body, 3, &mut state);
        assert!(next.is_done(), "expected Done for {body}");
    }
}

#[test]
fn test_token_stops_on_repeated_token() {
    let paginator = TokenPaginator::new("next", "start", "limit", 10);
    let mut state = PaginationState::new();

    assert!(paginator
        .process_response(&json!({"next": "same"}), 10, &mut state)
        .is_continue());
    assert!(paginator
        .process_response(&json!({"next": "same"}), 10, &mut state)
        .is_done());
}

#[test]
fn test_token_request_count_bound() {
    // 25 records, page size 10: pages of 10, 10, 5 and the server stops
    // returning a token after the last page
    let paginator = TokenPaginator::new("next", "start", "limit", 10);
    let mut state = PaginationState::new();
    let pages = [
        (json!({"next": "p2"}), 10),
        (json!({"next": "p3"}), 10),
        (json!({"next": ""}), 5),
    ];

    let mut requests = 0;
    for (body, count) in &pages {
        requests += 1;
        if paginator.process_response(body, *count, &mut state).is_done() {
            break;
        }
    }

    assert_eq!(requests, 3);
    assert!(requests <= 25_usize.div_ceil(10) + 1);
    assert_eq!(state.total_fetched, 25);
}

// ============================================================================
// NoPaginator Tests
// ============================================================================

#[test]
fn test_no_paginator_single_request() {
    let paginator = NoPaginator;
    let mut state = PaginationState::new();

    assert!(paginator.initial_params().is_empty());
    // A `next` in the body is ignored
    let next = paginator.process_response(&json!({"next": "abc"}), 4, &mut state);
    assert!(next.is_done());
    assert_eq!(state.total_fetched, 4);
}

// ============================================================================
// PaginationConfig Tests
// ============================================================================

#[test]
fn test_pagination_config_build() {
    assert_eq!(PaginationConfig::default(), PaginationConfig::None);
    assert!(PaginationConfig::None.build().initial_params().is_empty());

    let paginator = PaginationConfig::token(50).build();
    assert_eq!(paginator.initial_params(), params(&[("limit", "50")]));
}
