//! End-to-end tests against the real TMDB API
//!
//! These tests need a TMDB API key from .env and network access.
//! All tests are marked #[ignore] to prevent running in normal CI.
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --test e2e_live -- --ignored --nocapture
//! ```
//!
//! # Required environment variables (.env file)
//!
//! - `TMDB_API_KEY` - TMDB v3 API key

use movie_aggregator::{Config, MovieAggregator};

fn live_aggregator() -> Option<MovieAggregator> {
    dotenvy::dotenv().ok();
    let api_key = std::env::var("TMDB_API_KEY").ok()?;
    MovieAggregator::new(&Config::with_api_key(api_key)).ok()
}

/// The Shining has a title and at least one YouTube trailer
#[tokio::test]
#[ignore]
async fn test_load_known_movie() {
    let Some(aggregator) = live_aggregator() else {
        eprintln!("Skipping: TMDB_API_KEY not found in .env");
        return;
    };

    let outcome = aggregator.aggregate("694").await;
    let movie = outcome.entity().expect("movie 694 should load");

    assert_eq!(movie.title, "The Shining");
    assert!(
        movie
            .trailer_url
            .as_deref()
            .is_some_and(|url| url.starts_with("https://www.youtube.com/watch?v=")),
        "expected a YouTube trailer, got {:?}",
        movie.trailer_url
    );
    println!("{}", movie);
}

/// An unknown id fails with the API's own message
#[tokio::test]
#[ignore]
async fn test_unknown_movie_reports_not_found() {
    let Some(aggregator) = live_aggregator() else {
        eprintln!("Skipping: TMDB_API_KEY not found in .env");
        return;
    };

    let outcome = aggregator.aggregate("0").await;
    let failure = outcome.failure().expect("movie 0 should not exist");

    assert_eq!(failure.status(), Some(404));
    assert!(!failure.to_string().is_empty());
}

/// A bad key is rejected with 401 before any movie is built
#[tokio::test]
#[ignore]
async fn test_invalid_api_key() {
    let aggregator =
        MovieAggregator::new(&Config::with_api_key("definitely-not-a-key")).expect("valid config");

    let outcome = aggregator.aggregate("694").await;

    assert_eq!(outcome.failure().and_then(|e| e.status()), Some(401));
}
