//! Pagination module
//!
//! Supports: continuation token, no pagination
//!
//! # Overview
//!
//! A paginator decides, after each response, whether another page is
//! needed and which query parameters that page request carries. Activities
//! uses a continuation token (`next` in the envelope, sent back as
//! `start`); every other resource is answered by a single request.

mod strategies;
mod types;

pub use strategies::{NoPaginator, TokenPaginator};
pub use types::{extract_field, NextPage, PaginationConfig, PaginationState, Paginator};

#[cfg(test)]
mod tests;
