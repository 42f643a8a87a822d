//! HTTP client abstraction for testability

use super::types::ProviderError;
use std::time::Duration;
use tracing::trace;

/// Trait for HTTP GET operations.
///
/// This abstraction allows for dependency injection and easier testing by
/// enabling mock HTTP clients in tests.
pub trait HttpClient: Send {
    /// Performs an HTTP GET request, returning the response body as bytes.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Default User-Agent string for HTTP requests.
/// Some tile servers reject requests without a User-Agent.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new client with the given request timeout in milliseconds.
    pub fn new(timeout_ms: u64) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::Http(format!("GET {url} failed: {e}")))?;

        let response = response
            .error_for_status()
            .map_err(|e| ProviderError::Http(format!("GET {url} failed: {e}")))?;

        let bytes = response
            .bytes()
            .map_err(|e| ProviderError::Http(format!("GET {url} body read failed: {e}")))?;

        trace!(url, bytes = bytes.len(), "GET complete");
        Ok(bytes.to_vec())
    }
}
