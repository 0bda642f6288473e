//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService, CachedLink};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for redirect lookups.
///
/// Entries are JSON-encoded [`CachedLink`] values under `link:<code>`.
/// Uses `ConnectionManager` for connection reuse and reconnects. All
/// operations are fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - upper bound for every entry's TTL; controlled
    ///   via `CACHE_TTL_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "link:".to_string(),
        })
    }

    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, code: &str) -> CacheResult<Option<CachedLink>> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CachedLink>(&raw) {
                Ok(link) => {
                    debug!("Cache HIT: {}", code);
                    Ok(Some(link))
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry for {}: {}", code, e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", code);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", code, e);
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        code: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds
            .map(|t| t.min(self.default_ttl))
            .unwrap_or(self.default_ttl);

        if ttl == 0 {
            return Ok(());
        }

        let payload = serde_json::to_string(link)
            .map_err(|e| CacheError::OperationError(format!("Failed to encode entry: {}", e)))?;

        let key = self.build_key(code);
        let mut conn = self.client.clone();

        match conn.set_ex::<_, _, ()>(&key, payload, ttl).await {
            Ok(()) => {
                debug!("Cache SET: {} (TTL: {}s)", code, ttl);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", code, e);
                Ok(())
            }
        }
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", code);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", code, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
