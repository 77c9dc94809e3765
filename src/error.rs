//! Error types for movie-aggregator
//!
//! This module provides the error taxonomy used by the aggregation core:
//! - Transport failures (connection, timeout, unreadable body)
//! - Application failures (HTTP status >= 400, optionally with a server message)
//! - Input and configuration errors detected before any request is issued
//!
//! Every variant is `Clone + PartialEq` so an error observed on one sub-request can be
//! attached unchanged to the aggregation outcome and compared in tests.

use thiserror::Error;

/// Result type alias for movie-aggregator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for movie-aggregator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The request never produced a structured response
    ///
    /// Raised for connection errors, timeouts and bodies that could not be read.
    /// A transport failure on any sub-request is fatal to the whole aggregation.
    #[error("transport error for {url}: {message}")]
    Transport {
        /// The URL that was being requested (without the API key)
        url: String,
        /// Human-readable description of the failure
        message: String,
    },

    /// The remote service answered with an HTTP error status
    #[error("{message}")]
    Application {
        /// HTTP status code returned by the service (always >= 400)
        status: u16,
        /// The service's `status_message`, or a generic message built from the status code
        message: String,
    },

    /// The movie identifier cannot be used to build a request
    #[error("invalid movie id: {0:?}")]
    InvalidMovieId(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// A request URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Build a transport error from a reqwest failure
    ///
    /// The URL is taken from the caller rather than from reqwest so the API key
    /// carried in the query string never ends up in logs or error messages.
    pub fn transport(url: impl Into<String>, error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("request timed out: {}", error)
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else if error.is_body() || error.is_decode() {
            format!("failed to read response body: {}", error)
        } else {
            error.to_string()
        };

        Error::Transport {
            url: url.into(),
            message,
        }
    }

    /// Build an application error for an HTTP status without a server-provided message
    pub fn status_only(status: u16) -> Self {
        let message = match reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("HTTP {} {}", status, reason),
            None => format!("HTTP {}", status),
        };

        Error::Application { status, message }
    }

    /// Whether this error happened before a structured response was obtained
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// The HTTP status carried by an application error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Transport { .. } => "transport_error",
            Error::Application { status, .. } if *status >= 500 => "server_error",
            Error::Application { status: 404, .. } => "not_found",
            Error::Application { .. } => "client_error",
            Error::InvalidMovieId(_) => "invalid_movie_id",
            Error::Config { .. } => "config_error",
            Error::InvalidUrl(_) => "invalid_url",
        }
    }
}
