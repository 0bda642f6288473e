#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use shortlink::domain::click_event::{ClickEvent, ClickRecorder};
use shortlink::domain::entities::ShortLink;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::cache::NullCache;
use shortlink::infrastructure::persistence::MemoryLinkRepository;
use shortlink::state::{AppState, StateSettings};
use shortlink::telemetry;
use shortlink::utils::code_generator::{CodeGenerator, CodePolicy};
use shortlink::utils::storage_retry::StoragePolicy;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://short.test";

pub fn test_storage_policy() -> StoragePolicy {
    StoragePolicy {
        timeout: std::time::Duration::from_secs(1),
        retries: 1,
        base_backoff_ms: 1,
    }
}

/// State over a fresh in-memory store, with the click receiver left to the test.
pub fn create_test_state() -> (
    AppState,
    Arc<MemoryLinkRepository>,
    mpsc::Receiver<ClickEvent>,
) {
    create_test_state_with_capacity(100)
}

pub fn create_test_state_with_capacity(
    click_capacity: usize,
) -> (
    AppState,
    Arc<MemoryLinkRepository>,
    mpsc::Receiver<ClickEvent>,
) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let (clicks, rx) = ClickRecorder::channel(click_capacity);

    let state = AppState::new(
        repo.clone(),
        Arc::new(NullCache::new()),
        clicks,
        StateSettings {
            generator: CodeGenerator::new(CodePolicy::default()),
            storage: test_storage_policy(),
            base_url: BASE_URL.to_string(),
            default_ttl_seconds: None,
            sweep_interval: std::time::Duration::from_secs(60),
        },
    )
    .with_metrics(telemetry::install_metrics());

    (state, repo, rx)
}

pub async fn create_test_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    insert(repo, code, url, Utc::now(), None).await
}

pub async fn create_expired_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    let created_at = Utc::now() - Duration::hours(2);
    insert(
        repo,
        code,
        url,
        created_at,
        Some(created_at + Duration::hours(1)),
    )
    .await
}

async fn insert(
    repo: &MemoryLinkRepository,
    code: &str,
    url: &str,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
) -> ShortLink {
    repo.put(ShortLink::new(
        code.to_string(),
        url.to_string(),
        created_at,
        expires_at,
        false,
    ))
    .await
    .unwrap()
}
