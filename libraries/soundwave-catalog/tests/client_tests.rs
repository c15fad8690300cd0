//! Tests for the catalog client.
//!
//! These tests use mock servers to verify request shape, filtering, ranking,
//! caching and retry behavior without a real catalog.

use serde_json::{json, Value};
use soundwave_catalog::{CancellationToken, CatalogClient, CatalogConfig, CatalogError, Clock};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(id: u64, title: &str, artist: &str) -> Value {
    json!({
        "trackId": id,
        "trackName": title,
        "artistName": artist,
        "collectionName": "Album",
        "artworkUrl100": format!("https://img.example/{id}/100x100bb.jpg"),
        "previewUrl": format!("https://audio.example/{id}.m4a"),
        "trackTimeMillis": 30000
    })
}

fn body(records: Vec<Value>) -> Value {
    json!({ "resultCount": records.len(), "results": records })
}

fn test_config(server: &MockServer) -> CatalogConfig {
    CatalogConfig::new(server.uri()).with_retries(2, Duration::from_millis(10))
}

/// Clock that only moves when told to
struct ManualClock(Mutex<Instant>);

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Instant::now())))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.0.lock().unwrap()
    }
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_https_url() {
        assert!(CatalogClient::new(CatalogConfig::new("https://itunes.apple.com")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match CatalogClient::new(CatalogConfig::new("")).unwrap_err() {
            CatalogError::InvalidUrl(msg) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_scheme_rejected() {
        let result = CatalogClient::new(CatalogConfig::new("itunes.apple.com"));
        assert!(matches!(result, Err(CatalogError::InvalidUrl(_))));
    }
}

// =============================================================================
// Search Request Tests
// =============================================================================

mod search_request {
    use super::*;

    #[tokio::test]
    async fn test_request_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("term", "imagine"))
            .and(query_param("media", "music"))
            .and(query_param("entity", "song"))
            .and(query_param("limit", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![record(
                1, "Imagine", "John Lennon",
            )])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        let tracks = client.search_with_limit("imagine", 6).await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "1");
        assert_eq!(tracks[0].stream_url, "https://audio.example/1.m4a");
    }

    #[tokio::test]
    async fn test_country_is_sent_when_configured() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("country", "gb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server).with_country("gb")).unwrap();
        let tracks = client.search("imagine").await.unwrap();
        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![])))
            .expect(0)
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        assert!(client.search("").await.unwrap().is_empty());
        assert!(client.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_limit_is_used() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("limit", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        client.search("abba").await.unwrap();
    }
}

// =============================================================================
// Filtering and Ranking Tests
// =============================================================================

mod filtering_and_ranking {
    use super::*;

    #[tokio::test]
    async fn test_ranking_title_then_artist_then_rest() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![
                record(1, "Unrelated", "Y"),
                record(2, "Song", "Love Band"),
                record(3, "I Love You", "X"),
            ])))
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        let tracks = client.search("love").await.unwrap();

        let titles: Vec<_> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["I Love You", "Song", "Unrelated"]);
    }

    #[tokio::test]
    async fn test_records_without_preview_are_dropped() {
        let server = MockServer::start().await;

        let mut no_preview = record(1, "love", "Love");
        no_preview["previewUrl"] = Value::Null;
        let mut no_artist = record(2, "Love Me", "");
        no_artist.as_object_mut().unwrap().remove("artistName");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![
                no_preview,
                no_artist,
                record(3, "Lovely", "Z"),
            ])))
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        let tracks = client.search("love").await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "3");
    }

    #[tokio::test]
    async fn test_artwork_upscaled_when_configured() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(body(vec![record(5, "Imagine", "A")])),
            )
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server).with_artwork_size(600)).unwrap();
        let tracks = client.search("imagine").await.unwrap();
        assert_eq!(tracks[0].artwork_url, "https://img.example/5/600x600bb.jpg");
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        let err = client.search("imagine").await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}

// =============================================================================
// Cache Tests
// =============================================================================

mod cache {
    use super::*;

    #[tokio::test]
    async fn test_repeat_query_within_ttl_served_from_cache() {
        let server = MockServer::start().await;
        let clock = ManualClock::new();

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(body(vec![record(1, "Imagine", "A")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(&server).with_cache_ttl(Duration::from_secs(60));
        let client = CatalogClient::with_clock(config, clock.clone()).unwrap();

        let first = client.search("imagine").await.unwrap();
        clock.advance(Duration::from_secs(30));
        let second = client.search("  IMAGINE ").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let server = MockServer::start().await;
        let clock = ManualClock::new();

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(body(vec![record(1, "Imagine", "A")])),
            )
            .expect(2)
            .mount(&server)
            .await;

        let config = test_config(&server).with_cache_ttl(Duration::from_secs(60));
        let client = CatalogClient::with_clock(config, clock.clone()).unwrap();

        client.search("imagine").await.unwrap();
        clock.advance(Duration::from_secs(61));
        client.search("imagine").await.unwrap();
    }

    #[tokio::test]
    async fn test_different_limit_is_a_different_entry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![])))
            .expect(2)
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        client.search_with_limit("imagine", 6).await.unwrap();
        client.search_with_limit("imagine", 25).await.unwrap();
    }

    #[tokio::test]
    async fn test_least_recent_query_evicted_at_capacity() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("term", "first"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("term", "second"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![])))
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(&server).with_cache_max_entries(1);
        let client = CatalogClient::new(config).unwrap();

        client.search("first").await.unwrap();
        client.search("second").await.unwrap();
        client.search("second").await.unwrap();
        client.search("first").await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        assert!(client.search("imagine").await.is_err());
        assert!(client.search("imagine").await.is_err());
    }
}

// =============================================================================
// Error and Retry Tests
// =============================================================================

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_provider_error_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
            .expect(1)
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();

        match client.search("imagine").await.unwrap_err() {
            CatalogError::Provider { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal error");
            }
            other => panic!("Expected Provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_retried_then_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body(vec![]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = test_config(&server).with_request_timeout(Duration::from_millis(50));
        let client = CatalogClient::new(config).unwrap();

        let err = client.search("imagine").await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
        assert!(err.is_retryable());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_network_error() {
        let config = CatalogConfig::new("http://127.0.0.1:1")
            .with_retries(1, Duration::from_millis(1))
            .with_request_timeout(Duration::from_secs(2));
        let client = CatalogClient::new(config).unwrap();

        let err = client.search("imagine").await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
    }

    #[tokio::test]
    async fn test_cancelled_search() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body(vec![]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = client
            .search_cancellable("imagine", 6, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_short_circuits() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(vec![])))
            .expect(0)
            .mount(&server)
            .await;

        let client = CatalogClient::new(test_config(&server)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .search_cancellable("imagine", 6, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Cancelled));
    }
}
