//! Short link creation.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::telemetry;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::storage_retry::StoragePolicy;
use crate::utils::url_validator::validate_target_url;

/// Service for creating short links.
///
/// Validates the target and expiry, obtains a code from the
/// [`CodeGenerator`] (with the store's `exists` as collision oracle) and
/// commits the link with an atomic `put`.
///
/// Generating and inserting are two separate store calls, so two requests can
/// draw the same random code and race on `put`. The loser sees
/// [`AppError::CodeAlreadyExists`] and regenerates, up to the generator's
/// attempt limit. A colliding custom alias is reported to the caller instead.
pub struct ShorteningService<R: LinkRepository + ?Sized = dyn LinkRepository> {
    repository: Arc<R>,
    generator: CodeGenerator,
    storage: StoragePolicy,
    default_ttl_seconds: Option<i64>,
    base_url: String,
}

impl<R: LinkRepository + ?Sized> ShorteningService<R> {
    pub fn new(
        repository: Arc<R>,
        generator: CodeGenerator,
        storage: StoragePolicy,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            generator,
            storage,
            default_ttl_seconds: None,
            base_url: base_url.into(),
        }
    }

    /// TTL applied when a request carries none. `None` keeps such links forever.
    pub fn with_default_ttl(mut self, ttl_seconds: Option<i64>) -> Self {
        self.default_ttl_seconds = ttl_seconds;
        self
    }

    /// Creates a short link for `target_url`.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if `target_url` is not an absolute http(s) URL
    /// - [`AppError::InvalidExpiry`] if `ttl_seconds` is not positive
    /// - [`AppError::InvalidCode`] if `custom_code` violates the alias policy
    /// - [`AppError::CodeAlreadyExists`] if `custom_code` is taken
    /// - [`AppError::GenerationExhausted`] if no free random code was found
    /// - [`AppError::StorageTimeout`] / [`AppError::StorageUnavailable`] once retries run out
    pub async fn shorten(
        &self,
        target_url: &str,
        custom_code: Option<&str>,
        ttl_seconds: Option<i64>,
    ) -> Result<ShortLink, AppError> {
        let started = Instant::now();
        metrics::counter!(telemetry::SHORTEN_ATTEMPTS).increment(1);

        let result = self.create(target_url, custom_code, ttl_seconds).await;

        metrics::histogram!(telemetry::SHORTEN_DURATION).record(started.elapsed().as_secs_f64());

        match &result {
            Ok(link) => {
                metrics::counter!(telemetry::LINKS_CREATED).increment(1);
                info!(
                    code = %link.code,
                    is_custom = link.is_custom,
                    expires_at = ?link.expires_at,
                    "Short link created"
                );
            }
            Err(e) => {
                telemetry::record_error("shorten", e);
                if e.is_transient() || matches!(e, AppError::GenerationExhausted { .. }) {
                    warn!(error = %e, "Shorten failed");
                }
            }
        }

        result
    }

    /// Full public URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    async fn create(
        &self,
        target_url: &str,
        custom_code: Option<&str>,
        ttl_seconds: Option<i64>,
    ) -> Result<ShortLink, AppError> {
        validate_target_url(target_url).map_err(|e| AppError::invalid_url(e.to_string()))?;

        let now = Utc::now();
        let expires_at = self.expiry_for(now, ttl_seconds.or(self.default_ttl_seconds))?;

        let repository = &self.repository;
        let storage = self.storage;
        let max_attempts = self.generator.policy().max_attempts;

        for attempt in 1..=max_attempts {
            let generated = self
                .generator
                .generate(custom_code, |code| async move {
                    storage.call(|| repository.exists(&code)).await
                })
                .await?;

            let link = ShortLink::new(
                generated.code,
                target_url.to_string(),
                now,
                expires_at,
                generated.is_custom,
            );

            match storage.call(|| repository.put(link.clone())).await {
                Ok(stored) => return Ok(stored),
                Err(AppError::CodeAlreadyExists { code }) if !generated.is_custom => {
                    warn!(attempt, %code, "Generated code taken concurrently, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::GenerationExhausted {
            attempts: max_attempts,
        })
    }

    fn expiry_for(
        &self,
        now: DateTime<Utc>,
        ttl_seconds: Option<i64>,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        let Some(ttl) = ttl_seconds else {
            return Ok(None);
        };

        if ttl <= 0 {
            return Err(AppError::invalid_expiry(format!(
                "ttl_seconds must be positive, got {ttl}"
            )));
        }

        Duration::try_seconds(ttl)
            .and_then(|d| now.checked_add_signed(d))
            .map(Some)
            .ok_or_else(|| AppError::invalid_expiry("ttl_seconds is too large"))
    }
}
