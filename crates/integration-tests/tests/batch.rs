//! Tests for the batch/admin endpoint

mod harness;

use harness::config::ConfigBuilder;
use harness::mock_llm::MockLlm;
use harness::server::TestServer;

#[tokio::test]
async fn batch_generates_all_twelve_signs() {
    let mock = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/horoscopes/batch?timezone=UTC"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["timezone"], "UTC");
    assert_eq!(body["generated"].as_array().unwrap().len(), 12);
    assert!(body["failed"].as_object().unwrap().is_empty());
    assert_eq!(mock.completion_count(), 12);

    // Subsequent reads are all cache hits
    let read: serde_json::Value = server
        .client()
        .get(server.url("/v1/horoscope?sign=capricorn&timezone=UTC"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read["cached"], true);
    assert_eq!(mock.completion_count(), 12);
}

#[tokio::test]
async fn batch_reports_per_sign_failures_with_200() {
    let mock = MockLlm::start_failing().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/horoscopes/batch"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["generated"].as_array().unwrap().is_empty());
    assert_eq!(body["failed"].as_object().unwrap().len(), 12);
    // One attempt per sign; failures are not retried
    assert_eq!(mock.completion_count(), 12);
}

#[tokio::test]
async fn stuck_author_burns_the_retry_budget_but_batch_completes() {
    let mock = MockLlm::start_fixed_author().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let body: serde_json::Value = server
        .client()
        .post(server.url("/v1/horoscopes/batch?timezone=UTC"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // The soft cap never fails a sign; every record lands
    assert_eq!(body["generated"].as_array().unwrap().len(), 12);
    // Two signs under the cap, ten spending 3 extra attempts each
    assert_eq!(mock.completion_count(), 2 + 10 * 4);
}

#[tokio::test]
async fn batch_defaults_to_utc_and_guards_bad_timezones() {
    let mock = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).build();
    let server = TestServer::start(&config).await.unwrap();

    let body: serde_json::Value = server
        .client()
        .post(server.url("/v1/horoscopes/batch?timezone=Narnia/Lantern"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["timezone"], "UTC");
    assert_eq!(body["generated"].as_array().unwrap().len(), 12);
}
