//! Load one or more movies and print them as `title : trailer`
//!
//! ```bash
//! TMDB_API_KEY=... cargo run --example load_movie -- 694 603
//! ```

use movie_aggregator::{Config, MovieAggregator};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let api_key = std::env::var("TMDB_API_KEY").map_err(|_| "TMDB_API_KEY is not set")?;
    let config = Config::with_api_key(api_key);
    let aggregator = MovieAggregator::new(&config)?;

    let mut ids: Vec<String> = std::env::args().skip(1).collect();
    if ids.is_empty() {
        ids.push("694".to_string());
    }

    for outcome in aggregator.aggregate_many(ids).await {
        match outcome.into_result() {
            Ok(movie) => println!("{}", movie),
            Err(e) => println!("Error loading movie: {}", e),
        }
    }

    Ok(())
}
