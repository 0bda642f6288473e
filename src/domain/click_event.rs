//! Click event model and the handle used to enqueue it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::telemetry;

/// A single successful resolution waiting to be counted.
///
/// Created by [`crate::application::services::ResolutionService`] and drained
/// by [`crate::domain::click_worker::run_click_worker`], which turns it into an
/// atomic `increment_clicks` on the store.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            clicked_at: Utc::now(),
        }
    }
}

/// Sending half of the click pipeline.
///
/// [`ClickRecorder::record`] never waits: when the queue has room the event is
/// enqueued in place, and when it is full a detached task waits for capacity.
/// Either way the event reaches the worker unless the worker itself has shut
/// down.
///
/// Deferred sends are not capped: under sustained overload each extra click
/// holds one parked task until the worker catches up. Their number is exposed
/// by [`ClickRecorder::deferred`] and the `shortener_click_deferred_pending`
/// gauge.
#[derive(Debug, Clone)]
pub struct ClickRecorder {
    sender: mpsc::Sender<ClickEvent>,
    deferred: Arc<AtomicUsize>,
}

impl ClickRecorder {
    pub fn new(sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            sender,
            deferred: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a recorder together with the receiver the worker drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    pub fn record(&self, event: ClickEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(code = %event.code, "Click queue full, deferring enqueue");
                metrics::counter!(telemetry::CLICKS_DEFERRED).increment(1);
                metrics::gauge!(telemetry::CLICKS_DEFERRED_PENDING).increment(1.0);
                self.deferred.fetch_add(1, Ordering::Relaxed);

                let sender = self.sender.clone();
                let deferred = self.deferred.clone();
                tokio::spawn(async move {
                    if let Err(e) = sender.send(event).await {
                        warn!(code = %e.0.code, "Click worker stopped, click not recorded");
                    }
                    deferred.fetch_sub(1, Ordering::Relaxed);
                    metrics::gauge!(telemetry::CLICKS_DEFERRED_PENDING).decrement(1.0);
                });
            }
            Err(TrySendError::Closed(event)) => {
                warn!(code = %event.code, "Click worker stopped, click not recorded");
            }
        }
    }

    /// Clicks parked in detached tasks waiting for queue capacity.
    pub fn deferred(&self) -> usize {
        self.deferred.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots left in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}
