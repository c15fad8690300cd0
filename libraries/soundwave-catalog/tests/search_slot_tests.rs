//! Tests for the debounced search slot.

use serde_json::json;
use soundwave_catalog::{CatalogClient, CatalogConfig, SearchSlot, SearchSlotConfig, SearchStatus};
use std::time::Duration;
use tokio::sync::watch;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn slot_config() -> SearchSlotConfig {
    SearchSlotConfig {
        debounce: Duration::from_millis(50),
        min_query_len: 2,
        limit: Some(6),
    }
}

fn results_for(title: &str) -> serde_json::Value {
    json!({
        "resultCount": 1,
        "results": [{
            "trackId": 1,
            "trackName": title,
            "artistName": "Artist",
            "previewUrl": "https://audio.example/1.m4a"
        }]
    })
}

async fn wait_for<F>(rx: &mut watch::Receiver<SearchStatus>, mut done: F) -> SearchStatus
where
    F: FnMut(&SearchStatus) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        {
            let status = rx.borrow_and_update();
            if done(&*status) {
                return status.clone();
            }
        }
        tokio::time::timeout_at(deadline, rx.changed())
            .await
            .expect("timed out waiting for search status")
            .expect("search slot dropped");
    }
}

#[tokio::test]
async fn test_only_last_query_is_searched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("term", "love"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_for("Love Story")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("term", "lo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_for("Lo")))
        .expect(0)
        .mount(&server)
        .await;

    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let mut slot = SearchSlot::new(client, slot_config());
    let mut rx = slot.subscribe();

    slot.submit("lo");
    slot.submit("lov");
    slot.submit("love");

    let status = wait_for(&mut rx, |s| matches!(s, SearchStatus::Ready { .. })).await;
    match status {
        SearchStatus::Ready { query, tracks } => {
            assert_eq!(query, "love");
            assert_eq!(tracks.len(), 1);
            assert_eq!(tracks[0].title, "Love Story");
        }
        other => panic!("unexpected status {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_stale_response_never_published() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("term", "old"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(results_for("Old"))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("term", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_for("New")))
        .mount(&server)
        .await;

    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let mut slot = SearchSlot::new(client, slot_config());
    let mut rx = slot.subscribe();

    slot.submit("old");
    wait_for(&mut rx, |s| matches!(s, SearchStatus::Pending { query } if query == "old")).await;

    slot.submit("new");
    wait_for(&mut rx, |s| matches!(s, SearchStatus::Ready { .. })).await;

    // Give the old request time to finish; it must not overwrite the result
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(slot.status().query(), Some("new"));
    assert_eq!(slot.status().tracks().unwrap()[0].title, "New");
}

#[tokio::test]
async fn test_short_query_goes_idle_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_for("x")))
        .expect(0)
        .mount(&server)
        .await;

    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let mut slot = SearchSlot::new(client, slot_config());

    slot.submit(" a ");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(slot.status(), SearchStatus::Idle);
}

#[tokio::test]
async fn test_provider_failure_is_published() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let mut slot = SearchSlot::new(client, slot_config());
    let mut rx = slot.subscribe();

    slot.submit("imagine");
    let status = wait_for(&mut rx, |s| matches!(s, SearchStatus::Failed { .. })).await;

    match status {
        SearchStatus::Failed {
            query, retryable, ..
        } => {
            assert_eq!(query, "imagine");
            assert!(!retryable);
        }
        other => panic!("unexpected status {other:?}"),
    }
}

#[tokio::test]
async fn test_clear_cancels_pending_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results_for("x")))
        .expect(0)
        .mount(&server)
        .await;

    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let mut slot = SearchSlot::new(client, slot_config());

    slot.submit("imagine");
    slot.clear();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(slot.status(), SearchStatus::Idle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clear_wins_over_late_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(results_for("late"))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let mut slot = SearchSlot::new(client, slot_config());
    let mut rx = slot.subscribe();

    // Clear at several points around the moment the response lands
    for i in 0..8u64 {
        slot.submit(&format!("query {i}"));
        wait_for(&mut rx, |s| matches!(s, SearchStatus::Pending { .. })).await;

        tokio::time::sleep(Duration::from_millis(80 + i * 5)).await;
        slot.clear();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(slot.status(), SearchStatus::Idle, "iteration {i}");
    }
}
