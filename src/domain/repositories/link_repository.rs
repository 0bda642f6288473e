//! Repository trait for the short link mapping store.

use crate::domain::entities::{LinkSummary, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable code -> [`ShortLink`] store.
///
/// The store owns all concurrency control for links: inserts are an atomic
/// check-and-insert and click increments are an atomic add. Callers never
/// hold a lock across these calls.
///
/// `get` is a pure storage primitive and applies no expiry filtering; the
/// resolution and sweep policies live in the services.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process `DashMap` store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeAlreadyExists`] if the code is already stored.
    /// Two concurrent `put`s of the same code never both succeed.
    async fn put(&self, link: ShortLink) -> Result<ShortLink, AppError>;

    /// Fetches a link by code, expired or not.
    async fn get(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Returns true if the code is currently stored.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically adds one to the link's click count.
    ///
    /// Returns `Ok(false)` if the code no longer exists.
    async fn increment_clicks(&self, code: &str) -> Result<bool, AppError>;

    /// Removes a link. Returns `Ok(false)` if it was already gone.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Removes a link only if it is still expired at `now`.
    ///
    /// Returns `Ok(false)` if the code is gone or now holds a live link, e.g.
    /// one re-created after another sweeper removed the expired original.
    async fn delete_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError>;

    /// Lists every code whose `expires_at` is set and `<= now`.
    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError>;

    /// Returns up to `limit` links, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<ShortLink>, AppError>;

    /// Aggregate totals; `active_links` counts links not expired at `now`.
    async fn summary(&self, now: DateTime<Utc>) -> Result<LinkSummary, AppError>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
