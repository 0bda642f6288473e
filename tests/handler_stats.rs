mod common;

use axum_test::TestServer;
use shortlink::domain::repositories::LinkRepository;
use shortlink::routes::router;

#[tokio::test]
async fn test_stats_reports_click_count() {
    let (state, repo, _rx) = common::create_test_state();
    common::create_test_link(&repo, "stats1", "https://example.com").await;
    for _ in 0..3 {
        repo.increment_clicks("stats1").await.unwrap();
    }
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/api/stats/stats1").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "stats1");
    assert_eq!(json["target_url"], "https://example.com");
    assert_eq!(json["short_url"], format!("{}/stats1", common::BASE_URL));
    assert_eq!(json["click_count"], 3);
    assert_eq!(json["is_active"], true);
    assert!(json["expires_at"].is_null());
}

#[tokio::test]
async fn test_stats_for_expired_unswept_link() {
    let (state, repo, _rx) = common::create_test_state();
    common::create_expired_link(&repo, "old1", "https://example.com").await;
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/api/stats/old1").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["is_active"], false);
}

#[tokio::test]
async fn test_stats_not_found() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/api/stats/nonexistent").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_dashboard_summary_and_recent() {
    let (state, repo, _rx) = common::create_test_state();
    common::create_test_link(&repo, "live1", "https://a.example.com").await;
    common::create_test_link(&repo, "live2", "https://b.example.com").await;
    common::create_expired_link(&repo, "dead1", "https://c.example.com").await;
    repo.increment_clicks("live1").await.unwrap();
    repo.increment_clicks("live1").await.unwrap();
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/api/dashboard").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total_links"], 3);
    assert_eq!(json["active_links"], 2);
    assert_eq!(json["total_clicks"], 2);
    assert_eq!(json["recent"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_dashboard_respects_limit() {
    let (state, repo, _rx) = common::create_test_state();
    for i in 0..5 {
        common::create_test_link(&repo, &format!("code{i}"), "https://example.com").await;
    }
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/api/dashboard").add_query_param("limit", 2).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["recent"].as_array().unwrap().len(), 2);
    assert_eq!(json["total_links"], 5);
}

#[tokio::test]
async fn test_dashboard_rejects_bad_limit() {
    let (state, _repo, _rx) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/api/dashboard").add_query_param("limit", 0).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_cleanup_removes_only_expired_links() {
    let (state, repo, _rx) = common::create_test_state();
    common::create_test_link(&repo, "keep1", "https://example.com").await;
    common::create_expired_link(&repo, "drop1", "https://example.com").await;
    common::create_expired_link(&repo, "drop2", "https://example.com").await;
    let server = TestServer::new(router(state)).unwrap();

    let response = server.post("/api/cleanup").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["scanned"], 2);
    assert_eq!(json["deleted"], 2);
    assert_eq!(json["failed"], 0);

    assert!(repo.get("keep1").await.unwrap().is_some());
    assert!(repo.get("drop1").await.unwrap().is_none());
    server.get("/api/stats/drop2").await.assert_status_not_found();
}
