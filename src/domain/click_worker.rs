//! Background worker turning click events into counter increments.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::telemetry;
use crate::utils::storage_retry::StoragePolicy;

/// Drains `rx`, applying one atomic `increment_clicks` per event.
///
/// Up to `concurrency` increments run at once. Transient store failures are
/// retried according to `policy`; an event that still fails is logged and
/// counted under [`telemetry::CLICK_INCREMENT_FAILURES`]. An increment for a
/// code that has since been swept is silently discarded.
///
/// Returns once every sender is dropped and all in-flight increments have
/// finished, so awaiting the returned future flushes pending clicks.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<R>,
    concurrency: usize,
    policy: StoragePolicy,
) where
    R: LinkRepository + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        // Reap finished tasks so the set does not grow without bound.
        while in_flight.try_join_next().is_some() {}

        let repository = repository.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            apply_click(repository.as_ref(), &event, policy).await;
        });
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            error!("Click task panicked: {}", e);
        }
    }

    info!("Click worker stopped");
}

async fn apply_click<R>(repository: &R, event: &ClickEvent, policy: StoragePolicy)
where
    R: LinkRepository + ?Sized,
{
    match policy
        .call(|| repository.increment_clicks(&event.code))
        .await
    {
        Ok(true) => {}
        Ok(false) => debug!(code = %event.code, "Click for removed link discarded"),
        Err(e) => {
            metrics::counter!(telemetry::CLICK_INCREMENT_FAILURES).increment(1);
            warn!(
                code = %event.code,
                clicked_at = %event.clicked_at,
                error = %e,
                "Failed to record click"
            );
        }
    }
}
