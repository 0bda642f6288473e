//! Shared application state injected into handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::services::{
    ExpirySweeper, ResolutionService, ShorteningService, StatsService,
};
use crate::domain::click_event::ClickRecorder;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::storage_retry::StoragePolicy;

/// Everything a request handler needs, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub shortening: Arc<ShorteningService>,
    pub resolution: Arc<ResolutionService>,
    pub stats: Arc<StatsService>,
    pub sweeper: Arc<ExpirySweeper>,
    pub repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    /// Renders `GET /metrics`; `None` when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

/// Inputs for [`AppState::new`] that are not the store or the cache.
#[derive(Clone)]
pub struct StateSettings {
    pub generator: CodeGenerator,
    pub storage: StoragePolicy,
    pub base_url: String,
    pub default_ttl_seconds: Option<i64>,
    pub sweep_interval: std::time::Duration,
}

impl AppState {
    /// Builds every service on top of one store and one cache.
    ///
    /// `clicks` is the sending half of the click pipeline; the matching
    /// receiver must be handed to
    /// [`run_click_worker`](crate::domain::click_worker::run_click_worker).
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        clicks: ClickRecorder,
        settings: StateSettings,
    ) -> Self {
        let shortening = ShorteningService::new(
            repository.clone(),
            settings.generator,
            settings.storage,
            settings.base_url,
        )
        .with_default_ttl(settings.default_ttl_seconds);

        let resolution =
            ResolutionService::new(repository.clone(), cache.clone(), clicks, settings.storage);

        let stats = StatsService::new(repository.clone(), settings.storage);

        let sweeper = ExpirySweeper::new(repository.clone(), cache.clone(), settings.sweep_interval);

        Self {
            shortening: Arc::new(shortening),
            resolution: Arc::new(resolution),
            stats: Arc::new(stats),
            sweeper: Arc::new(sweeper),
            repository,
            cache,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Option<PrometheusHandle>) -> Self {
        self.metrics = metrics;
        self
    }
}
