//! Single-request fetching
//!
//! A [`Fetcher`] turns one [`RequestSpec`] into exactly one [`FetchResult`]. It owns the
//! base URL and API key it was constructed with and shares nothing mutable with other
//! fetches, so any number of them can run concurrently.

use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use crate::types::{FetchResult, RequestSpec};

/// Issues single-attempt requests against the configured API
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    /// Create a fetcher backed by reqwest
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.http)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a fetcher using a caller-provided transport
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            transport,
            base_url: config.base_url()?,
            api_key: config.api_key.clone(),
        })
    }

    /// Build the full request URL and its redacted form for logs
    ///
    /// # Errors
    ///
    /// Returns error if the spec's path cannot be joined onto the base URL
    pub fn request_url(&self, spec: &RequestSpec) -> Result<(Url, String)> {
        let mut url = self.base_url.join(&spec.path)?;
        // query_pairs_mut leaves a bare "?" behind when nothing is appended
        if !spec.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&spec.query);
        }
        let display_url = url.to_string();

        url.query_pairs_mut().append_pair("api_key", &self.api_key);

        Ok((url, display_url))
    }

    /// Perform one request and report its result
    ///
    /// Never retries. Transport failures (including an unbuildable URL) are reported
    /// through [`FetchResult::Failed`]; any received response, whatever its status,
    /// is reported as [`FetchResult::Received`].
    pub async fn fetch(&self, spec: &RequestSpec) -> FetchResult {
        let (url, display_url) = match self.request_url(spec) {
            Ok(urls) => urls,
            Err(e) => {
                warn!(
                    role = %spec.role,
                    path = %spec.path,
                    error = %e,
                    "could not build request URL"
                );
                return FetchResult::Failed(e);
            }
        };

        debug!(role = %spec.role, url = %display_url, "fetching");

        match self.transport.perform_request(&url, &display_url).await {
            Ok(response) => {
                debug!(
                    role = %spec.role,
                    status = response.status,
                    bytes = response.body.len(),
                    "response received"
                );
                FetchResult::Received {
                    status_code: response.status,
                    payload: response.body,
                }
            }
            Err(e) => {
                warn!(role = %spec.role, url = %display_url, error = %e, "fetch failed");
                FetchResult::Failed(e)
            }
        }
    }

    /// Run [`Fetcher::fetch`] on its own task and deliver the result through a one-shot channel
    ///
    /// Exactly one value is sent. If the receiver has been dropped the result is discarded;
    /// the in-flight request is not cancelled.
    pub fn spawn(&self, spec: RequestSpec) -> oneshot::Receiver<FetchResult> {
        let (tx, rx) = oneshot::channel();
        let fetcher = self.clone();

        tokio::spawn(async move {
            let result = fetcher.fetch(&spec).await;
            if tx.send(result).is_err() {
                debug!(role = %spec.role, "result discarded, aggregation was abandoned");
            }
        });

        rx
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::RawResponse;
    use crate::types::{MovieId, SubRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every URL it is asked for and answers with a fixed response
    struct RecordingTransport {
        seen: Mutex<Vec<(String, String)>>,
        response: Result<RawResponse>,
    }

    impl RecordingTransport {
        fn answering(response: Result<RawResponse>) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                response,
            })
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn perform_request(&self, url: &Url, display_url: &str) -> Result<RawResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_string(), display_url.to_string()));
            self.response.clone()
        }
    }

    fn config() -> Config {
        let mut config = Config::with_api_key("secret");
        config.http.base_url = "http://tmdb.test/3".to_string();
        config
    }

    #[tokio::test]
    async fn api_key_is_sent_but_not_displayed() {
        let transport = RecordingTransport::answering(Ok(RawResponse {
            status: 200,
            body: b"{}".to_vec(),
        }));
        let fetcher = Fetcher::with_transport(&config(), transport.clone()).unwrap();
        let spec = RequestSpec::for_movie(SubRequest::Videos, &MovieId::from("694"))
            .with_query("language", "en-US");

        let result = fetcher.fetch(&spec).await;

        assert!(result.is_success());
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "exactly one request per fetch");
        assert_eq!(
            seen[0].0,
            "http://tmdb.test/3/movie/694/videos?language=en-US&api_key=secret"
        );
        assert_eq!(
            seen[0].1,
            "http://tmdb.test/3/movie/694/videos?language=en-US"
        );
    }

    #[tokio::test]
    async fn error_status_is_received_not_failed() {
        let transport = RecordingTransport::answering(Ok(RawResponse {
            status: 401,
            body: br#"{"status_message":"Invalid API key"}"#.to_vec(),
        }));
        let fetcher = Fetcher::with_transport(&config(), transport).unwrap();
        let spec = RequestSpec::for_movie(SubRequest::Details, &MovieId::from("694"));

        let result = fetcher.fetch(&spec).await;

        assert_eq!(result.status_code(), Some(401));
        assert!(result.failure().is_none());
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn transport_failure_is_reported_once() {
        let failure = Error::Transport {
            url: "http://tmdb.test/3/movie/694".into(),
            message: "connection reset".into(),
        };
        let transport = RecordingTransport::answering(Err(failure.clone()));
        let fetcher = Fetcher::with_transport(&config(), transport.clone()).unwrap();
        let spec = RequestSpec::for_movie(SubRequest::Details, &MovieId::from("694"));

        let result = fetcher.spawn(spec).await.unwrap();

        assert_eq!(result, FetchResult::Failed(failure));
        assert_eq!(transport.seen.lock().unwrap().len(), 1, "no retries");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let transport = RecordingTransport::answering(Ok(RawResponse {
            status: 200,
            body: Vec::new(),
        }));
        let fetcher = Fetcher::with_transport(&config(), transport).unwrap();

        let debug = format!("{:?}", fetcher);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("tmdb.test"));
    }
}
