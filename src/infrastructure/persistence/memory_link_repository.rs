//! In-process link store backed by `DashMap`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{LinkSummary, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link store kept entirely in memory.
///
/// Used for development (`STORAGE_BACKEND=memory`) and tests. Inserts go
/// through the entry API, so check-and-insert happens under one shard lock;
/// increments mutate the record under the shard write lock, so concurrent
/// increments on one code serialize without lost updates.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, ShortLink>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn put(&self, link: ShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::code_exists(link.code)),
            Entry::Vacant(slot) => {
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn get(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(code))
    }

    async fn increment_clicks(&self, code: &str) -> Result<bool, AppError> {
        match self.links.get_mut(code) {
            Some(mut entry) => {
                entry.click_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.remove(code).is_some())
    }

    async fn delete_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        Ok(self
            .links
            .remove_if(code, |_, link| link.is_expired_at(now))
            .is_some())
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError> {
        Ok(self
            .links
            .iter()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key().clone())
            .collect())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self.links.iter().map(|e| e.value().clone()).collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        links.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(links)
    }

    async fn summary(&self, now: DateTime<Utc>) -> Result<LinkSummary, AppError> {
        let mut summary = LinkSummary::default();

        for entry in self.links.iter() {
            summary.total_links += 1;
            summary.total_clicks += entry.click_count;
            if !entry.is_expired_at(now) {
                summary.active_links += 1;
            }
        }

        Ok(summary)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
