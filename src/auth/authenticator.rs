//! Authenticator implementation
//!
//! Applies authentication to outgoing requests.

use super::types::AuthConfig;
use crate::error::{Error, Result};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Create a bearer-token authenticator
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(AuthConfig::bearer(token))
    }

    /// The auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),

            AuthConfig::Bearer { token } => {
                if token.trim().is_empty() {
                    return Err(Error::auth("Bearer token is empty"));
                }
                Ok(req.bearer_auth(token))
            }
        }
    }
}
