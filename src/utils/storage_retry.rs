//! Timeout and bounded retry for store calls.

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::error::AppError;

/// Upper bound for a single backoff delay.
const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// How service-layer code talks to the store.
///
/// Each attempt is bounded by `timeout`; an overrun surfaces as
/// [`AppError::StorageTimeout`]. Transient failures (see
/// [`AppError::is_transient`]) are retried up to `retries` more times with
/// jittered exponential backoff starting at roughly `2 * base_backoff_ms`.
/// Any other error is returned on the first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoragePolicy {
    pub timeout: Duration,
    pub retries: usize,
    pub base_backoff_ms: u64,
}

impl Default for StoragePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
            retries: 3,
            base_backoff_ms: 25,
        }
    }
}

impl StoragePolicy {
    pub fn new(timeout: Duration, retries: usize) -> Self {
        Self {
            timeout,
            retries,
            ..Self::default()
        }
    }

    fn backoff(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(2)
            .factor(self.base_backoff_ms.max(1))
            .max_delay(MAX_BACKOFF)
            .map(jitter)
            .take(self.retries)
    }

    /// Runs `op` under the timeout and retry rules.
    pub async fn call<T, F, Fut>(&self, mut op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let timeout = self.timeout;

        RetryIf::start(
            self.backoff(),
            || {
                let attempt = op();
                async move {
                    match tokio::time::timeout(timeout, attempt).await {
                        Ok(result) => result,
                        Err(_) => Err(AppError::StorageTimeout),
                    }
                }
            },
            AppError::is_transient,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy(retries: usize) -> StoragePolicy {
        StoragePolicy {
            timeout: Duration::from_millis(50),
            retries,
            base_backoff_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let result = fast_policy(3)
            .call(|| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, AppError>(42) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let result = fast_policy(3)
            .call(|| {
                let n = c.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(AppError::StorageUnavailable)
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let result: Result<(), AppError> = fast_policy(2)
            .call(|| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::StorageUnavailable) }
            })
            .await;

        assert!(matches!(result, Err(AppError::StorageUnavailable)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();

        let result: Result<(), AppError> = fast_policy(3)
            .call(|| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::code_exists("promo")) }
            })
            .await;

        assert!(matches!(result, Err(AppError::CodeAlreadyExists { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let result: Result<(), AppError> = fast_policy(0)
            .call(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::StorageTimeout)));
    }
}
