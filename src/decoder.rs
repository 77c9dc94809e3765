//! Decoding of collected payloads into a [`Movie`]
//!
//! The decoder never fails. Malformed bodies and missing fields degrade to empty
//! or absent values; hard failures are detected upstream by the aggregator before
//! any payload reaches this module.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TrailerConfig;
use crate::types::{Movie, SubRequest};

/// Which matching candidate wins when several videos are hosted on the target site
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Keep the last match in list order
    #[default]
    LastMatch,
    /// Keep the first match in list order
    FirstMatch,
}

#[derive(Debug, Default, Deserialize)]
struct Details {
    original_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Videos {
    results: Option<Vec<RawVideo>>,
}

// Explicit nulls are tolerated per field so one bad entry does not discard the list
#[derive(Debug, Deserialize)]
struct RawVideo {
    site: Option<String>,
    key: Option<String>,
}

impl From<RawVideo> for Video {
    fn from(raw: RawVideo) -> Self {
        Self {
            site: raw.site.unwrap_or_default(),
            key: raw.key.unwrap_or_default(),
        }
    }
}

/// One entry of the videos payload
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Video {
    /// Hosting platform, e.g. "YouTube"
    pub site: String,
    /// Platform-specific identifier
    pub key: String,
}

/// Builds a [`Movie`] from the payloads of one aggregation
#[derive(Clone, Debug)]
pub struct ResultDecoder {
    site: String,
    url_prefix: String,
    policy: SelectionPolicy,
}

impl Default for ResultDecoder {
    fn default() -> Self {
        Self::new(&TrailerConfig::default())
    }
}

impl ResultDecoder {
    /// Create a decoder for the given trailer settings
    pub fn new(config: &TrailerConfig) -> Self {
        Self {
            site: config.site.clone(),
            url_prefix: config.url_prefix.clone(),
            policy: config.policy,
        }
    }

    /// Decode payloads given in [`SubRequest::ALL`] order
    ///
    /// Missing payloads are treated like empty ones.
    pub fn decode(&self, payloads: &[&[u8]]) -> Movie {
        let mut movie = Movie::default();

        for (role, payload) in SubRequest::ALL.iter().zip(payloads) {
            match role {
                SubRequest::Details => {
                    movie.title = decode_or_default::<Details>(*role, payload)
                        .original_title
                        .unwrap_or_default();
                }
                SubRequest::Videos => {
                    let videos: Vec<Video> = decode_or_default::<Videos>(*role, payload)
                        .results
                        .unwrap_or_default()
                        .into_iter()
                        .map(Video::from)
                        .collect();
                    movie.trailer_url = self
                        .select(&videos)
                        .map(|video| format!("{}{}", self.url_prefix, video.key));
                }
            }
        }

        movie
    }

    /// Pick the video hosted on the target site according to the policy
    pub fn select<'a>(&self, videos: &'a [Video]) -> Option<&'a Video> {
        let mut candidates = videos
            .iter()
            .filter(|v| v.site == self.site && !v.key.is_empty());

        match self.policy {
            SelectionPolicy::LastMatch => candidates.last(),
            SelectionPolicy::FirstMatch => candidates.next(),
        }
    }
}

fn decode_or_default<T>(role: SubRequest, payload: &[u8]) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    serde_json::from_slice(payload).unwrap_or_else(|e| {
        debug!(role = %role, error = %e, "payload did not decode, using defaults");
        T::default()
    })
}
