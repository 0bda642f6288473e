mod common;

use axum_test::TestServer;
use shortlink::routes::router;

#[tokio::test]
async fn test_health_ok() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_click_worker_gone() {
    let (state, _repo, rx) = common::create_test_state();
    drop(rx);
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}

#[tokio::test]
async fn test_index_lists_endpoints() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["name"], "shortlink");
    assert!(
        json["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e == "POST /api/shorten")
    );
}

#[tokio::test]
async fn test_metrics_counts_shorten_requests() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    server
        .post("/api/shorten")
        .json(&serde_json::json!({ "url": "https://example.com/metrics" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server.get("/metrics").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("shortener_shorten_attempts_total"), "{body}");
    assert!(body.contains("shortener_links_created_total"), "{body}");
}

#[tokio::test]
async fn test_metrics_unavailable_without_recorder() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = TestServer::new(router(state.with_metrics(None))).unwrap();

    let response = server.get("/metrics").await;

    assert_eq!(response.status_code(), 503);
}
