//! Client configuration
//!
//! Bundles the knobs of the data-access layer: where the API lives, how long
//! a single attempt may take, how failures are retried, and how long fetched
//! data stays fresh in the session cache.

use std::time::Duration;

use crate::api::{RetryPolicy, DEFAULT_TIMEOUT};

/// Default base URL of the community resource API
pub const DEFAULT_BASE_URL: &str = "https://api.newcomerhub.example.org";

/// Configuration for the API client and session cache
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing path
    pub base_url: String,
    /// Per-attempt request timeout
    pub request_timeout: Duration,
    /// Retry budget and delay for failed requests
    pub retry: RetryPolicy,
    /// How long fetched resources stay fresh in the cache
    pub default_ttl: chrono::Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            default_ttl: chrono::Duration::minutes(30),
        }
    }
}
