//! Read-only link statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{LinkSummary, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::storage_retry::StoragePolicy;

/// Store-wide overview with the newest links.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub summary: LinkSummary,
    pub recent: Vec<ShortLink>,
}

/// Service for inspecting stored links and their click counters.
///
/// Unlike resolution, stats report a link even after it has expired, as long
/// as the sweeper has not yet removed it.
pub struct StatsService<R: LinkRepository + ?Sized = dyn LinkRepository> {
    repository: Arc<R>,
    storage: StoragePolicy,
}

impl<R: LinkRepository + ?Sized> StatsService<R> {
    pub fn new(repository: Arc<R>, storage: StoragePolicy) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Returns the stored record for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn get_stats(&self, code: &str) -> Result<ShortLink, AppError> {
        self.storage
            .call(|| self.repository.get(code))
            .await?
            .ok_or_else(|| AppError::not_found(code))
    }

    /// Aggregate counters evaluated at `now` plus the `limit` newest links.
    pub async fn dashboard(&self, limit: i64, now: DateTime<Utc>) -> Result<Dashboard, AppError> {
        let summary = self.storage.call(|| self.repository.summary(now)).await?;
        let recent = self.storage.call(|| self.repository.recent(limit)).await?;

        Ok(Dashboard { summary, recent })
    }
}
