//! Fan-out/fan-in aggregation of one movie
//!
//! [`MovieAggregator::aggregate`] launches every sub-request for a movie at once, waits
//! on a join barrier until each one has reported exactly once, and only then decides
//! the outcome:
//!
//! 1. Results are slotted by declared position as they arrive, so arrival order never
//!    influences the output.
//! 2. The complete set is checked in declared order. A transport failure anywhere wins
//!    over HTTP error statuses; among HTTP errors the first declared one wins.
//! 3. With no error, the payloads go to the [`ResultDecoder`].
//!
//! Abandoning the returned future does not cancel requests that are already in flight.
//! Their results are discarded when they arrive.

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::decoder::ResultDecoder;
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::transport::Transport;
use crate::types::{AggregationOutcome, FetchResult, Movie, MovieId, RequestSpec, SubRequest};


/// Assembles [`Movie`]s from concurrently fetched details and videos
#[derive(Clone, Debug)]
pub struct MovieAggregator {
    fetcher: Fetcher,
    decoder: ResultDecoder,
}

impl MovieAggregator {
    /// Create an aggregator that talks to the configured API over HTTP
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(
            Fetcher::new(config)?,
            ResultDecoder::new(&config.trailer),
        ))
    }

    /// Create an aggregator on top of a caller-provided transport
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(
            Fetcher::with_transport(config, transport)?,
            ResultDecoder::new(&config.trailer),
        ))
    }

    /// Assemble an aggregator from an existing fetcher and decoder
    pub fn from_parts(fetcher: Fetcher, decoder: ResultDecoder) -> Self {
        Self { fetcher, decoder }
    }

    /// The sub-requests needed for one movie, in declared order
    pub fn sub_requests(movie_id: &MovieId) -> Vec<RequestSpec> {
        SubRequest::ALL
            .iter()
            .map(|role| RequestSpec::for_movie(*role, movie_id))
            .collect()
    }

    /// Aggregate one movie
    ///
    /// Always produces exactly one outcome. The outcome carries a [`Movie`] only if
    /// every sub-request transported successfully with a non-error status.
    pub async fn aggregate(&self, movie_id: impl Into<MovieId>) -> AggregationOutcome {
        let movie_id = movie_id.into();

        let raw = movie_id.as_str().trim();
        // "." and ".." survive percent-encoding and would be resolved as dot-segments
        if raw.is_empty() || raw == "." || raw == ".." {
            warn!(movie_id = %movie_id, "rejecting movie id that is not a path segment");
            return AggregationOutcome::new(
                movie_id.clone(),
                Err(Error::InvalidMovieId(movie_id.0)),
            );
        }

        let specs = Self::sub_requests(&movie_id);
        debug!(movie_id = %movie_id, requests = specs.len(), "launching sub-requests");

        // Every fetch is started before any result is awaited
        let receivers: Vec<_> = specs
            .into_iter()
            .map(|spec| (spec.role, self.fetcher.spawn(spec)))
            .collect();

        let results = join_barrier(&movie_id, receivers).await;
        let result = check_results(&results).map(|payloads| self.decoder.decode(&payloads));

        match &result {
            Ok(movie) => info!(
                movie_id = %movie_id,
                title = %movie.title,
                has_trailer = movie.trailer_url.is_some(),
                "movie aggregated"
            ),
            Err(e) => warn!(
                movie_id = %movie_id,
                code = e.error_code(),
                error = %e,
                "movie aggregation failed"
            ),
        }

        AggregationOutcome::new(movie_id, result)
    }

    /// Aggregate several movies concurrently
    ///
    /// Returns one outcome per id, in the order the ids were given. A failure for one
    /// movie does not affect the others.
    pub async fn aggregate_many<I, T>(&self, movie_ids: I) -> Vec<AggregationOutcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<MovieId>,
    {
        futures::future::join_all(movie_ids.into_iter().map(|id| self.aggregate(id))).await
    }

    /// Aggregate one movie and return a plain result
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the aggregation
    pub async fn load_movie(&self, movie_id: impl Into<MovieId>) -> Result<Movie> {
        self.aggregate(movie_id).await.into_result()
    }
}

/// Wait until every receiver has delivered, consuming results in arrival order
///
/// Results are returned in declared order. A receiver whose sender was dropped
/// without sending (the fetch task died) counts as a transport failure, so the
/// barrier always completes with exactly one result per sub-request.
async fn join_barrier(
    movie_id: &MovieId,
    receivers: Vec<(SubRequest, oneshot::Receiver<FetchResult>)>,
) -> Vec<FetchResult> {
    let mut slots: Vec<Option<FetchResult>> = receivers.iter().map(|_| None).collect();

    let mut pending: FuturesUnordered<_> = receivers
        .into_iter()
        .enumerate()
        .map(|(index, (role, rx))| async move { (index, role, rx.await) })
        .collect();

    while let Some((index, role, received)) = pending.next().await {
        let result = received.unwrap_or_else(|_| {
            FetchResult::Failed(Error::Transport {
                url: role.to_string(),
                message: "fetch task ended without reporting a result".to_string(),
            })
        });

        debug!(
            movie_id = %movie_id,
            role = %role,
            status = ?result.status_code(),
            remaining = pending.len(),
            "sub-request reported"
        );
        slots[index] = Some(result);
    }

    slots.into_iter().flatten().collect()
}

#[derive(Debug, Default, Deserialize)]
struct StatusBody {
    status_message: Option<String>,
}

/// Compose the outcome-level error from a complete, declared-order result set
///
/// Transport failures are checked first across all results, then HTTP error statuses.
/// This is not a single in-order scan: a transport failure on a later sub-request wins
/// over an HTTP error on an earlier one. On success the payloads are returned in the
/// same order.
///
/// # Errors
///
/// Returns the first transport failure, or else the first application failure
pub fn check_results(results: &[FetchResult]) -> Result<Vec<&[u8]>> {
    if let Some(failure) = results.iter().find_map(FetchResult::failure) {
        return Err(failure.clone());
    }

    let mut payloads = Vec::with_capacity(results.len());
    for result in results {
        if let FetchResult::Received {
            status_code,
            payload,
        } = result
        {
            if *status_code >= 400 {
                return Err(application_error(*status_code, payload));
            }
            payloads.push(payload.as_slice());
        }
    }

    Ok(payloads)
}

/// Build an application error, preferring the service's own message
fn application_error(status: u16, payload: &[u8]) -> Error {
    let body: StatusBody = serde_json::from_slice(payload).unwrap_or_default();

    match body.status_message {
        Some(message) if !message.trim().is_empty() => Error::Application { status, message },
        _ => Error::status_only(status),
    }
}
