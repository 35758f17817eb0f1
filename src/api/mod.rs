//! HTTP client for the community resource API
//!
//! This module provides the `ApiClient`, a thin wrapper over reqwest that
//! attaches the session's auth headers to every request, enforces a fixed
//! per-attempt timeout, and retries failed requests under a `RetryPolicy`.
//! Non-success statuses and unparseable bodies count as failures exactly like
//! transport errors, and every failure class is retried indiscriminately.

pub mod retry;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub use retry::RetryPolicy;

/// Header carrying the anti-forgery token on every request
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Per-attempt timeout applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the API
///
/// All variants are treated as retryable by `ApiClient`; the retry loop does
/// not distinguish a refused connection from a 404.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed at the transport level (includes timeouts)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned HTTP status {0}")]
    HttpStatus(u16),

    /// Failed to parse JSON response body
    #[error("failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

/// Credential pair attached to every request
///
/// Mirrors the session storage of the site: a bearer token for the
/// `Authorization` header and an anti-forgery token for `X-CSRF-Token`.
/// Either may be absent, in which case its header is simply omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthTokens {
    /// Bearer token for the Authorization header
    pub bearer: Option<String>,
    /// Anti-forgery token
    pub csrf: Option<String>,
}

impl AuthTokens {
    /// Tokens with only a bearer component
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer: Some(token.into()),
            csrf: None,
        }
    }
}

/// Client for the community resource API
///
/// Holds the base URL, the auth tokens, and the retry policy. Each attempt
/// builds a fresh request so the auth headers are present on retries too.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: AuthTokens,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client for the given base URL with default timeout and retry
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom per-attempt timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            tokens: AuthTokens::default(),
            retry: RetryPolicy::default(),
        })
    }

    /// Sets the auth tokens attached to every request
    pub fn with_tokens(mut self, tokens: AuthTokens) -> Self {
        self.tokens = tokens;
        self
    }

    /// Sets the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The configured retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Joins the base URL with a resource path
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attaches the auth header pair to a request
    ///
    /// The client contributes only these two headers; anything set on the
    /// request afterwards takes precedence on conflict.
    fn apply_auth(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(bearer) = &self.tokens.bearer {
            request = request.bearer_auth(bearer);
        }
        if let Some(csrf) = &self.tokens.csrf {
            request = request.header(CSRF_HEADER, csrf);
        }
        request
    }

    /// Checks the status, then decodes the body as JSON
    ///
    /// Decoding goes through text first so a malformed body yields a
    /// `ParseError` rather than folding into the transport error.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetches `path` and decodes the JSON response, retrying on any failure
    ///
    /// # Arguments
    /// * `path` - Resource path relative to the base URL (e.g., "api/stories")
    ///
    /// # Returns
    /// * `Ok(T)` - The decoded response from the first successful attempt
    /// * `Err(ApiError)` - The error from the final attempt once the budget
    ///   is exhausted
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        retry::with_retry(&self.retry, |attempt| {
            debug!(%url, attempt, "GET");
            let request = self.apply_auth(self.client.get(&url));
            async move {
                let response = request.send().await?;
                Self::decode(response).await
            }
        })
        .await
    }

    /// Posts `body` as JSON to `path` and decodes the response, with retries
    ///
    /// The body is serialized fresh for each attempt, and the same failure
    /// semantics as `get_json` apply.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        retry::with_retry(&self.retry, |attempt| {
            debug!(%url, attempt, "POST");
            let request = self.apply_auth(self.client.post(&url)).json(body);
            async move {
                let response = request.send().await?;
                Self::decode(response).await
            }
        })
        .await
    }
}
