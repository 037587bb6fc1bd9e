//! Outbound page requests

use crate::error::Result;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// A single GET against the App API: base URL, resource path and query
///
/// Authentication is not part of the request; the client applies it when
/// sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    url: Url,
    query: BTreeMap<String, String>,
}

impl PageRequest {
    /// Resolve `path` against `base_url`
    ///
    /// `base_url` must end with `/` or its last segment is replaced.
    pub fn new(base_url: &Url, path: &str) -> Result<Self> {
        let url = base_url.join(path.trim_start_matches('/'))?;
        Ok(Self {
            url,
            query: BTreeMap::new(),
        })
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Request URL without query parameters
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Query parameters
    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Get a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}
