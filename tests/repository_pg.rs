//! PostgreSQL store tests.
//!
//! Run with a database available:
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test repository_pg -- --ignored
//! ```

use chrono::{Duration, Utc};
use shortlink::domain::entities::ShortLink;
use shortlink::domain::repositories::LinkRepository;
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn link(code: &str, expires_in: Option<Duration>) -> ShortLink {
    let now = Utc::now();
    ShortLink::new(
        code.to_string(),
        "https://example.com".to_string(),
        now - Duration::hours(1),
        expires_in.map(|d| now + d),
        false,
    )
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_put_and_get(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let stored = repo.put(link("abc123", None)).await.unwrap();
    assert_eq!(stored.code, "abc123");
    assert_eq!(stored.click_count, 0);

    let found = repo.get("abc123").await.unwrap().unwrap();
    assert_eq!(found.target_url, "https://example.com");
    assert!(repo.exists("abc123").await.unwrap());
    assert!(repo.get("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_put_conflict_keeps_original(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.put(link("dup001", None)).await.unwrap();

    let mut other = link("dup001", None);
    other.target_url = "https://other.example.com".to_string();
    let err = repo.put(other).await.unwrap_err();

    assert!(matches!(err, AppError::CodeAlreadyExists { .. }));
    let found = repo.get("dup001").await.unwrap().unwrap();
    assert_eq!(found.target_url, "https://example.com");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_increments(pool: PgPool) {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    repo.put(link("hot001", None)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..100 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.increment_clicks("hot001").await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }

    let found = repo.get("hot001").await.unwrap().unwrap();
    assert_eq!(found.click_count, 100);
    assert!(!repo.increment_clicks("missing").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_expired_and_delete(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.put(link("old001", Some(Duration::minutes(-1)))).await.unwrap();
    repo.put(link("new001", Some(Duration::hours(1)))).await.unwrap();
    repo.put(link("forever", None)).await.unwrap();

    let expired = repo.list_expired(Utc::now()).await.unwrap();
    assert_eq!(expired, vec!["old001".to_string()]);

    assert!(repo.delete("old001").await.unwrap());
    assert!(!repo.delete("old001").await.unwrap());
    assert!(repo.list_expired(Utc::now()).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_summary_and_recent(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.put(link("live01", None)).await.unwrap();
    repo.put(link("dead01", Some(Duration::minutes(-1)))).await.unwrap();
    repo.increment_clicks("live01").await.unwrap();

    let summary = repo.summary(Utc::now()).await.unwrap();
    assert_eq!(summary.total_links, 2);
    assert_eq!(summary.active_links, 1);
    assert_eq!(summary.total_clicks, 1);

    assert_eq!(repo.recent(1).await.unwrap().len(), 1);
    repo.ping().await.unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_expired_spares_live_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let now = Utc::now();
    repo.put(link("promo", Some(Duration::minutes(-1)))).await.unwrap();
    let listed = repo.list_expired(now).await.unwrap();
    assert_eq!(listed, vec!["promo".to_string()]);

    repo.delete("promo").await.unwrap();
    repo.put(link("promo", Some(Duration::hours(1)))).await.unwrap();

    assert!(!repo.delete_expired("promo", now).await.unwrap());
    assert!(repo.get("promo").await.unwrap().is_some());

    repo.put(link("gone01", Some(Duration::minutes(-1)))).await.unwrap();
    assert!(repo.delete_expired("gone01", Utc::now()).await.unwrap());
}
