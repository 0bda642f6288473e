//! Short code resolution for redirects.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::click_event::{ClickEvent, ClickRecorder};
use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedLink};
use crate::telemetry;
use crate::utils::storage_retry::StoragePolicy;

/// Service answering `code -> target URL` lookups.
///
/// # Request Flow
///
/// 1. Check the cache; a hit is still subject to the expiry check
/// 2. On a miss, read the store (with timeout and bounded retry)
/// 3. Reject missing codes with `NotFound` and dead ones with `Expired`
/// 4. Hand a [`ClickEvent`] to the click pipeline and return the target
///
/// Step 4 never waits on storage: the increment is performed by the click
/// worker.
pub struct ResolutionService<R: LinkRepository + ?Sized = dyn LinkRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    clicks: ClickRecorder,
    storage: StoragePolicy,
}

impl<R: LinkRepository + ?Sized> ResolutionService<R> {
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        clicks: ClickRecorder,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            clicks,
            storage,
        }
    }

    /// Resolves `code` to its target URL and schedules a click increment.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code does not exist
    /// - [`AppError::Expired`] if the link's expiry has passed, swept or not
    /// - [`AppError::StorageTimeout`] / [`AppError::StorageUnavailable`] once retries run out
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let started = Instant::now();
        metrics::counter!(telemetry::REDIRECT_ATTEMPTS).increment(1);

        let result = self.lookup(code, Utc::now()).await;

        metrics::histogram!(telemetry::RESOLVE_DURATION).record(started.elapsed().as_secs_f64());

        match &result {
            Ok(_) => {
                self.clicks.record(ClickEvent::new(code));
                metrics::counter!(telemetry::REDIRECTS).increment(1);
            }
            Err(e) => {
                telemetry::record_error("resolve", e);
                debug!(code, error = %e, "Resolve failed");
            }
        }

        result
    }

    /// Click pipeline handle, exposed for health reporting.
    pub fn clicks(&self) -> &ClickRecorder {
        &self.clicks
    }

    async fn lookup(&self, code: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        match self.cache.get_link(code).await {
            Ok(Some(cached)) => {
                if cached.is_expired_at(now) {
                    self.evict(code);
                    return Err(AppError::expired(code));
                }
                return Ok(cached.target_url);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache error, falling back to store: {}", e),
        }

        let link = self
            .storage
            .call(|| self.repository.get(code))
            .await?
            .ok_or_else(|| AppError::not_found(code))?;

        if link.is_expired_at(now) {
            return Err(AppError::expired(code));
        }

        self.populate_cache(&link, now);

        Ok(link.target_url)
    }

    fn populate_cache(&self, link: &ShortLink, now: DateTime<Utc>) {
        let ttl = match link.expires_at {
            Some(expires_at) => match u64::try_from((expires_at - now).num_seconds()) {
                Ok(0) | Err(_) => return,
                Ok(secs) => Some(secs),
            },
            None => None,
        };

        let cache = self.cache.clone();
        let code = link.code.clone();
        let entry = CachedLink {
            target_url: link.target_url.clone(),
            expires_at: link.expires_at,
        };

        tokio::spawn(async move {
            if let Err(e) = cache.set_link(&code, &entry, ttl).await {
                warn!("Failed to cache link {}: {}", code, e);
            }
        });
    }

    fn evict(&self, code: &str) {
        let cache = self.cache.clone();
        let code = code.to_string();

        tokio::spawn(async move {
            if let Err(e) = cache.invalidate(&code).await {
                warn!("Failed to evict expired link {}: {}", code, e);
            }
        });
    }
}
