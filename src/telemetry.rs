//! Logging setup, metric names and the Prometheus recorder.
//!
//! Metrics are emitted through the `metrics` facade. The server installs a
//! Prometheus recorder at startup with [`install_metrics`] and renders it on
//! `GET /metrics`; a process that never installs one gets no-op emissions.

use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const SHORTEN_ATTEMPTS: &str = "shortener_shorten_attempts_total";
pub const LINKS_CREATED: &str = "shortener_links_created_total";
pub const SHORTEN_DURATION: &str = "shortener_shorten_duration_seconds";
pub const REDIRECT_ATTEMPTS: &str = "shortener_redirect_attempts_total";
pub const REDIRECTS: &str = "shortener_redirects_total";
pub const RESOLVE_DURATION: &str = "shortener_resolve_duration_seconds";
pub const ERRORS: &str = "shortener_errors_total";
pub const SWEEP_DELETED: &str = "shortener_sweep_deleted_total";
pub const SWEEP_FAILURES: &str = "shortener_sweep_failures_total";
pub const CLICK_INCREMENT_FAILURES: &str = "shortener_click_increment_failures_total";
pub const CLICKS_DEFERRED: &str = "shortener_click_deferred_total";
pub const CLICKS_DEFERRED_PENDING: &str = "shortener_click_deferred_pending";

/// How often histogram buckets are compacted.
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static PROMETHEUS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Installs the global Prometheus recorder once per process.
///
/// Later calls return the same handle. Returns `None` if another recorder was
/// already installed globally.
pub fn install_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            match metrics::set_global_recorder(recorder) {
                Ok(()) => Some(handle),
                Err(e) => {
                    tracing::warn!("Metrics recorder not installed: {}", e);
                    None
                }
            }
        })
        .clone()
}

/// Runs recorder upkeep until `shutdown` flips to `true` or its sender is dropped.
pub async fn run_metrics_upkeep(handle: PrometheusHandle, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => handle.run_upkeep(),
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

/// Counts an error under its kind label.
pub fn record_error(operation: &'static str, err: &AppError) {
    metrics::counter!(ERRORS, "operation" => operation, "kind" => err.kind()).increment(1);
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies.
/// `log_format` is `"json"` for structured output, anything else for text.
pub fn init_tracing(default_level: &str, log_format: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
