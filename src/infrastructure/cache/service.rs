//! Cache service trait and error types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// The part of a link needed to answer a redirect.
///
/// `expires_at` travels with the URL so a cache hit is subject to the same
/// expiry check as a store read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLink {
    pub target_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedLink {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }
}

/// Trait for caching code -> target mappings in front of the store.
///
/// Implementations must be thread-safe and fail open: a broken cache degrades
/// to store lookups, it never fails a redirect.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up a cached link.
    ///
    /// Returns `Ok(None)` on a miss. Backend errors are logged and reported as
    /// misses.
    async fn get_link(&self, code: &str) -> CacheResult<Option<CachedLink>>;

    /// Caches a link for at most `ttl_seconds` (implementation default if `None`).
    async fn set_link(
        &self,
        code: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Drops a cached link, e.g. after the sweeper deleted it.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health output.
    fn backend_name(&self) -> &'static str;
}
