//! Connection settings for `Client`.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

/// Production GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.slab.com/v1/graphql";

/// Whole-request timeout applied by the default transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const TOKEN_ENV: &str = "SLAB_TOKEN";
pub const ENDPOINT_ENV: &str = "SLAB_ENDPOINT";
pub const TIMEOUT_ENV: &str = "SLAB_TIMEOUT_SECS";

/// Endpoint, credentials and HTTP settings, fixed for the client's lifetime.
#[derive(Clone)]
pub struct Config {
    pub endpoint: String,
    pub token: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `SLAB_TOKEN` (required), `SLAB_ENDPOINT` and `SLAB_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let token = lookup(TOKEN_ENV)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidArgument(format!("{TOKEN_ENV} is not set")))?;
        let mut config = Self::new(token);

        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|e| !e.is_empty()) {
            config.endpoint = endpoint;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::InvalidArgument(format!("{TIMEOUT_ENV} must be whole seconds, got {raw:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
