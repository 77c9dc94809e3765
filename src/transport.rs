//! HTTP transport boundary
//!
//! The [`Transport`] trait is the only place the aggregation core touches the network.
//! It performs exactly one attempt per call: no retries, no backoff. Implementations
//! report a fully read response (any status) or a transport-level [`Error`].
//!
//! [`HttpTransport`] is the production implementation built on reqwest. Tests swap in
//! scripted implementations to control timing and arrival order.

use async_trait::async_trait;
use url::Url;

use crate::config::HttpConfig;
use crate::error::{Error, Result};

/// A response whose body has been read completely
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body bytes
    pub body: Vec<u8>,
}

/// Single-attempt request execution
///
/// `display_url` is the URL with secrets stripped; implementations use it for
/// error messages and logs instead of `url`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET request and read the whole body
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when no response was obtained or its body
    /// could not be read. HTTP error statuses are *not* errors at this level.
    async fn perform_request(&self, url: &Url, display_url: &str) -> Result<RawResponse>;
}

/// reqwest-backed transport
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport from the HTTP settings
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: Some("http".to_string()),
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform_request(&self, url: &Url, display_url: &str) -> Result<RawResponse> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::transport(display_url, &e.without_url()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(display_url, &e.without_url()))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
