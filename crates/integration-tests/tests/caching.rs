//! Tests for cache-disabled mode and the cache-busting endpoint

mod harness;

use harness::config::ConfigBuilder;
use harness::mock_llm::MockLlm;
use harness::server::TestServer;

#[tokio::test]
async fn caching_disabled_generates_on_every_request() {
    let mock = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).without_cache().build();
    let server = TestServer::start(&config).await.unwrap();

    for expected_calls in 1..=2 {
        let body: serde_json::Value = server
            .client()
            .get(server.url("/v1/horoscope?sign=taurus&timezone=UTC"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["cached"], false);
        // No batch fan-out either: exactly one generation per request
        assert_eq!(mock.completion_count(), expected_calls);
    }
}

#[tokio::test]
async fn purge_busts_exactly_one_bucket() {
    let mock = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    // Warm the daily bucket
    server
        .client()
        .get(server.url("/v1/horoscope?sign=cancer&timezone=UTC"))
        .send()
        .await
        .unwrap();
    assert_eq!(mock.completion_count(), 12);

    let purge: serde_json::Value = server
        .client()
        .delete(server.url("/v1/horoscope/cache?sign=cancer&timezone=UTC"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(purge["success"], true);
    assert_eq!(purge["removed"], true);

    // Second purge finds nothing
    let again: serde_json::Value = server
        .client()
        .delete(server.url("/v1/horoscope/cache?sign=cancer&timezone=UTC"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(again["removed"], false);

    // Other signs in the bucket were untouched
    let other: serde_json::Value = server
        .client()
        .get(server.url("/v1/horoscope?sign=leo&timezone=UTC"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(other["cached"], true);
    assert_eq!(mock.completion_count(), 12);
}

#[tokio::test]
async fn purge_validates_input_like_the_read_path() {
    let mock = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let resp = server
        .client()
        .delete(server.url("/v1/horoscope/cache?sign=unknown"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
