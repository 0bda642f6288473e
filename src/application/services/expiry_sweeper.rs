//! Periodic removal of expired links.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::telemetry;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Expired codes returned by the store.
    pub scanned: usize,
    /// Codes removed by this sweep.
    pub deleted: usize,
    /// Deletions that failed and will be retried next cycle.
    pub failed: usize,
    /// True when another sweep was already running and this one did nothing.
    pub skipped: bool,
}

/// Background task purging expired links from the store.
///
/// Every deletion is independent: a failed delete is logged and counted, the
/// rest of the batch still runs, and the code is picked up again on the next
/// cycle. Deleting a code that is already gone is not an error.
///
/// Deletes re-check expiry in the store, so a sweeper in another process, or
/// the admin CLI, racing this one can never remove a link created after the
/// expired codes were listed.
///
/// At most one sweep runs at a time, whether started by the timer or on
/// demand through [`ExpirySweeper::sweep_once`].
pub struct ExpirySweeper<R: LinkRepository + ?Sized = dyn LinkRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    interval: Duration,
    running: AtomicBool,
}

/// Clears the running flag when a sweep ends, however it ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R: LinkRepository + ?Sized> ExpirySweeper<R> {
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>, interval: Duration) -> Self {
        Self {
            repository,
            cache,
            interval,
            running: AtomicBool::new(false),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Deletes every link that had expired at `now`.
    ///
    /// # Errors
    ///
    /// Fails only if the expired codes cannot be listed; per-code failures are
    /// reported in [`SweepReport::failed`].
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<SweepReport, AppError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sweep already in progress, skipping");
            return Ok(SweepReport {
                skipped: true,
                ..SweepReport::default()
            });
        }
        let _guard = RunningGuard(&self.running);

        let codes = self.repository.list_expired(now).await?;
        let mut report = SweepReport {
            scanned: codes.len(),
            ..SweepReport::default()
        };

        for code in codes {
            match self.repository.delete_expired(&code, now).await {
                Ok(true) => {
                    report.deleted += 1;
                    if let Err(e) = self.cache.invalidate(&code).await {
                        warn!("Failed to invalidate swept link {}: {}", code, e);
                    }
                }
                Ok(false) => debug!(%code, "Expired link already removed or replaced"),
                Err(e) => {
                    report.failed += 1;
                    warn!(%code, error = %e, "Failed to delete expired link, will retry next sweep");
                }
            }
        }

        metrics::counter!(telemetry::SWEEP_DELETED).increment(report.deleted as u64);
        metrics::counter!(telemetry::SWEEP_FAILURES).increment(report.failed as u64);

        if report.deleted > 0 || report.failed > 0 {
            info!(
                scanned = report.scanned,
                deleted = report.deleted,
                failed = report.failed,
                "Expiry sweep finished"
            );
        }

        Ok(report)
    }

    /// Sweeps on every tick until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The first tick fires immediately, so stale links left from a previous
    /// run are purged at startup. Ticks missed during a slow sweep are skipped
    /// rather than queued.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_secs = self.interval.as_secs(), "Expiry sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once(Utc::now()).await {
                        error!(error = %e, "Expiry sweep failed, retrying next cycle");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Expiry sweeper stopped");
    }
}
