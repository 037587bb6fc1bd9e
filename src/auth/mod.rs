//! Authentication module
//!
//! The App API authenticates every request with a bearer token (the
//! workspace's App API key). One `Authenticator` is built per source and
//! shared, read-only, by every stream.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
