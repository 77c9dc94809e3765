//! Configuration types for movie-aggregator

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::decoder::SelectionPolicy;
use crate::error::{Error, Result};

/// Top-level configuration
///
/// The API key is an explicit value injected into the fetcher at construction time.
/// Nothing in the crate reads it from the environment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// TMDB API key, sent as the `api_key` query parameter
    #[serde(default)]
    pub api_key: String,

    /// HTTP settings shared by every fetch
    #[serde(default)]
    pub http: HttpConfig,

    /// How the trailer is picked out of the videos payload
    #[serde(default)]
    pub trailer: TrailerConfig,
}

impl Config {
    /// Create a configuration with the given API key and defaults for everything else
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Parse the configured base URL
    ///
    /// A trailing slash is appended when missing so relative paths are joined
    /// below the base instead of replacing its last segment.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.http.base_url.trim();
        let url = if raw.ends_with('/') {
            Url::parse(raw)?
        } else {
            Url::parse(&format!("{}/", raw))?
        };

        if url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("base URL {} cannot be used as a base", raw),
                key: Some("http.base_url".to_string()),
            });
        }

        Ok(url)
    }

    /// Check the configuration for values that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config {
                message: "api_key must not be empty".to_string(),
                key: Some("api_key".to_string()),
            });
        }

        let base = self.base_url()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!("unsupported base URL scheme: {}", base.scheme()),
                key: Some("http.base_url".to_string()),
            });
        }

        if self.http.timeout.is_zero() {
            return Err(Error::Config {
                message: "timeout must be greater than zero".to_string(),
                key: Some("http.timeout".to_string()),
            });
        }

        if self.trailer.site.trim().is_empty() {
            return Err(Error::Config {
                message: "trailer site must not be empty".to_string(),
                key: Some("trailer.site".to_string()),
            });
        }

        Ok(())
    }
}

/// HTTP client settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL of the API (default: "https://api.themoviedb.org/3/")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout covering connect, send and body read (default: 30 seconds)
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Trailer selection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrailerConfig {
    /// Platform tag a video must carry to be selected (default: "YouTube")
    #[serde(default = "default_trailer_site")]
    pub site: String,

    /// Prefix joined with the selected video's key (default: "https://www.youtube.com/watch?v=")
    #[serde(default = "default_trailer_url_prefix")]
    pub url_prefix: String,

    /// Which matching candidate wins (default: the last one)
    #[serde(default)]
    pub policy: SelectionPolicy,
}

impl Default for TrailerConfig {
    fn default() -> Self {
        Self {
            site: default_trailer_site(),
            url_prefix: default_trailer_url_prefix(),
            policy: SelectionPolicy::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3/".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("movie-aggregator/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_trailer_site() -> String {
    "YouTube".to_string()
}

fn default_trailer_url_prefix() -> String {
    "https://www.youtube.com/watch?v=".to_string()
}
