//! HTTP transport for the remote feed.
//!
//! [`HttpClient`] is the narrow seam the remote loader depends on: one GET,
//! one response, delivered once. [`ReqwestHttpClient`] is the production
//! adapter. It applies the user agent, timeout, redirect limit and body size
//! limit from configuration. Status codes are passed through untouched;
//! interpreting them is the mapper's job.

pub mod error;
pub mod url;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use feedkit_core::AppConfig;
use reqwest::{Client, header};

pub use self::url::{UrlError, canonicalize};
pub use error::HttpClientError;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Performs a single GET request.
///
/// Completes exactly once per call, on whichever runtime thread finishes the
/// request.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &::url::Url) -> Result<HttpResponse, HttpClientError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    async fn get(&self, url: &::url::Url) -> Result<HttpResponse, HttpClientError> {
        (**self).get(url).await
    }
}

/// Configuration for the reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string (default: "feedkit/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "feedkit/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for HttpClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// reqwest-backed [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    http: Client,
    config: HttpClientConfig,
}

impl ReqwestHttpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self, HttpClientError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| HttpClientError::Build(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn check_size(&self, size: usize) -> Result<(), HttpClientError> {
        if size > self.config.max_bytes {
            return Err(HttpClientError::TooLarge { size, limit: self.config.max_bytes });
        }
        Ok(())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &::url::Url) -> Result<HttpResponse, HttpClientError> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();

        if let Some(len) = response.content_length() {
            self.check_size(len as usize)?;
        }

        let body = response.bytes().await?;
        self.check_size(body.len())?;

        tracing::debug!(
            url = %url,
            status,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched feed"
        );

        Ok(HttpResponse { status, body })
    }
}
