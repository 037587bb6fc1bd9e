//! HTTP module
//!
//! Builds App API page requests and sends them with retry, backoff and
//! rate limiting.
//!
//! # Features
//!
//! - **Request building**: base URL + resource path + query parameters
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Bearer token applied to every request

mod client;
mod rate_limit;
mod request;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::PageRequest;
