//! Common test utilities for movie-aggregator integration tests

#![allow(dead_code)]

use movie_aggregator::{Config, MovieAggregator};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API key every mock expects
pub const TEST_API_KEY: &str = "test-api-key";

/// Details body for movie 694
pub const DETAILS_BODY: &str = r#"{"id":694,"original_title":"The Shining"}"#;

/// Videos body for movie 694 with two YouTube candidates
pub const VIDEOS_BODY: &str = r#"{"id":694,"results":[
    {"site":"Vimeo","key":"A"},
    {"site":"YouTube","key":"B"},
    {"site":"YouTube","key":"C"}
]}"#;

/// Configuration pointing at the mock server's `/3/` prefix
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::with_api_key(TEST_API_KEY);
    config.http.base_url = format!("{}/3", server.uri());
    config.http.timeout = Duration::from_secs(2);
    config
}

/// Aggregator backed by a real HTTP client talking to the mock server
pub fn mock_aggregator(server: &MockServer) -> MovieAggregator {
    MovieAggregator::new(&mock_config(server)).expect("valid mock configuration")
}

/// Mount a GET mock for `path_str` that requires the test API key
pub async fn mount_json(server: &MockServer, path_str: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .and(query_param("api_key", TEST_API_KEY))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

/// JSON response with the given status and body
pub fn json(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "application/json")
}
