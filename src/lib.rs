//! # movie-aggregator
//!
//! Builds one [`Movie`] out of several independent TMDB endpoints by fetching them
//! concurrently and combining the results once all of them have reported.
//!
//! ## Design
//!
//! - **Fan-out/fan-in** - every sub-request starts at once; a join barrier waits for all of them
//! - **All or nothing** - any failed sub-request aborts the movie, no partial entities
//! - **Single attempt** - no retries, rate limiting or caching inside the core
//! - **Library-first** - printing and serving results is left to the caller
//!
//! ## Quick Start
//!
//! ```no_run
//! use movie_aggregator::{Config, MovieAggregator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::with_api_key("your-tmdb-api-key");
//!     let aggregator = MovieAggregator::new(&config)?;
//!
//!     let outcome = aggregator.aggregate("694").await;
//!     match outcome.entity() {
//!         Some(movie) => println!("{}", movie),
//!         None => eprintln!("Error loading movie: {:?}", outcome.failure()),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Fan-out/fan-in aggregation
pub mod aggregator;
/// Configuration types
pub mod config;
/// Payload decoding and trailer selection
pub mod decoder;
/// Error types
pub mod error;
/// Single-request fetching
pub mod fetcher;
/// HTTP transport boundary
pub mod transport;
/// Core types
pub mod types;

// Re-export commonly used types
pub use aggregator::{MovieAggregator, check_results};
pub use config::{Config, HttpConfig, TrailerConfig};
pub use decoder::{ResultDecoder, SelectionPolicy, Video};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::{AggregationOutcome, FetchResult, Movie, MovieId, RequestSpec, SubRequest};
