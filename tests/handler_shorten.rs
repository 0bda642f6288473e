mod common;

use axum_test::TestServer;
use serde_json::json;
use shortlink::domain::repositories::LinkRepository;
use shortlink::routes::router;

fn server() -> (
    TestServer,
    std::sync::Arc<shortlink::infrastructure::persistence::MemoryLinkRepository>,
) {
    let (state, repo, _rx) = common::create_test_state();
    (TestServer::new(router(state)).unwrap(), repo)
}

#[tokio::test]
async fn test_shorten_success() {
    let (server, repo) = server();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/very/long/path" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(json["short_url"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(json["target_url"], "https://example.com/very/long/path");
    assert_eq!(json["is_custom"], false);
    assert!(json.get("expires_at").is_none());

    let stored = repo.get(code).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 0);
}

#[tokio::test]
async fn test_shorten_same_url_twice_gives_distinct_codes() {
    let (server, _repo) = server();
    let body = json!({ "url": "https://example.com" });

    let first = server.post("/api/shorten").json(&body).await;
    let second = server.post("/api/shorten").json(&body).await;

    let first = first.json::<serde_json::Value>();
    let second = second.json::<serde_json::Value>();
    assert_ne!(first["code"], second["code"]);
}

#[tokio::test]
async fn test_shorten_with_custom_code() {
    let (server, _repo) = server();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com", "custom_code": "promo" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "promo");
    assert_eq!(json["is_custom"], true);
}

#[tokio::test]
async fn test_shorten_custom_code_conflict() {
    let (server, repo) = server();
    common::create_test_link(&repo, "promo", "https://first.example.com").await;

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://second.example.com", "custom_code": "promo" }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "code_already_exists");

    let stored = repo.get("promo").await.unwrap().unwrap();
    assert_eq!(stored.target_url, "https://first.example.com");
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let (server, repo) = server();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "not-a-url" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_url");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_unsupported_scheme() {
    let (server, _repo) = server();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_url");
}

#[tokio::test]
async fn test_shorten_invalid_custom_code() {
    let (server, _repo) = server();

    for alias in ["ab", "has space", "-edge", "health"] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "url": "https://example.com", "custom_code": alias }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "invalid_code", "alias {alias:?}");
    }
}

#[tokio::test]
async fn test_shorten_with_ttl_sets_expiry() {
    let (server, _repo) = server();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com", "ttl_seconds": 3600 }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert!(json["expires_at"].is_string());
}

#[tokio::test]
async fn test_shorten_rejects_non_positive_ttl() {
    let (server, _repo) = server();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com", "ttl_seconds": 0 }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_expiry");
}

#[tokio::test]
async fn test_shorten_malformed_body() {
    let (server, _repo) = server();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "target": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_request");
}

#[tokio::test]
async fn test_shorten_rejects_url_with_control_characters() {
    let (server, repo) = server();

    for url in ["https://example.com/a\nb", "https://example.com/a\tb", " https://example.com"] {
        let response = server.post("/api/shorten").json(&json!({ "url": url })).await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "invalid_url");
    }

    assert!(repo.is_empty());
}
