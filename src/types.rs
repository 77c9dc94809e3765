//! Core types for movie-aggregator

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a movie in the remote catalogue
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub String);

impl MovieId {
    /// Create a new MovieId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A movie assembled from the details and videos endpoints
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Original title, empty if the details payload did not carry one
    pub title: String,

    /// Trailer URL on the target platform, `None` if no candidate matched
    pub trailer_url: Option<String>,
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} : {}",
            self.title,
            self.trailer_url.as_deref().unwrap_or_default()
        )
    }
}

/// Role of a sub-request within one aggregation
///
/// The declaration order of [`SubRequest::ALL`] is the order in which results are
/// checked for errors and handed to the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubRequest {
    /// `movie/{id}`: yields the title
    Details,
    /// `movie/{id}/videos`: yields the trailer candidates
    Videos,
}

impl SubRequest {
    /// Every sub-request needed to build a [`Movie`], in declared order
    pub const ALL: [SubRequest; 2] = [SubRequest::Details, SubRequest::Videos];

    /// Relative path of this sub-request for the given (already encoded) movie id
    pub fn path(&self, encoded_id: &str) -> String {
        match self {
            SubRequest::Details => format!("movie/{}", encoded_id),
            SubRequest::Videos => format!("movie/{}/videos", encoded_id),
        }
    }
}

impl std::fmt::Display for SubRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubRequest::Details => f.write_str("details"),
            SubRequest::Videos => f.write_str("videos"),
        }
    }
}

/// Immutable description of one remote call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSpec {
    /// Which part of the movie this request contributes
    pub role: SubRequest,

    /// Path relative to the configured base URL
    pub path: String,

    /// Call-specific query parameters (the API key is added by the fetcher)
    pub query: Vec<(String, String)>,
}

impl RequestSpec {
    /// Build the spec for one sub-request of the given movie
    pub fn for_movie(role: SubRequest, movie_id: &MovieId) -> Self {
        let encoded = urlencoding::encode(movie_id.as_str());
        Self {
            role,
            path: role.path(&encoded),
            query: Vec::new(),
        }
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Result of exactly one fetch
///
/// A fetch either received a response (whatever its status) or failed at the
/// transport level. Application-level failures are detected later, by the aggregator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchResult {
    /// A response was received and its body read completely
    Received {
        /// HTTP status code
        status_code: u16,
        /// Raw response body
        payload: Vec<u8>,
    },
    /// No structured response was obtained
    Failed(Error),
}

impl FetchResult {
    /// Whether the transport succeeded and the status is not an HTTP error
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Received { status_code, .. } if *status_code < 400)
    }

    /// The HTTP status code, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchResult::Received { status_code, .. } => Some(*status_code),
            FetchResult::Failed(_) => None,
        }
    }

    /// The raw body, if a response was received
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            FetchResult::Received { payload, .. } => Some(payload),
            FetchResult::Failed(_) => None,
        }
    }

    /// The transport failure, if any
    pub fn failure(&self) -> Option<&Error> {
        match self {
            FetchResult::Received { .. } => None,
            FetchResult::Failed(e) => Some(e),
        }
    }
}

/// Final, immutable result of aggregating one movie
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregationOutcome {
    movie_id: MovieId,
    result: Result<Movie>,
}

impl AggregationOutcome {
    pub(crate) fn new(movie_id: MovieId, result: Result<Movie>) -> Self {
        Self { movie_id, result }
    }

    /// The movie this outcome belongs to
    pub fn movie_id(&self) -> &MovieId {
        &self.movie_id
    }

    /// The assembled movie, present only on overall success
    pub fn entity(&self) -> Option<&Movie> {
        self.result.as_ref().ok()
    }

    /// The error that aborted the aggregation
    pub fn failure(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }

    /// Whether the aggregation succeeded
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Consume the outcome into a plain result
    pub fn into_result(self) -> Result<Movie> {
        self.result
    }
}
