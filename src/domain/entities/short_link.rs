//! ShortLink entity: the persisted code -> URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code mapped to its target URL, with usage and expiry metadata.
///
/// `created_at` is fixed at creation. `click_count` is only ever raised by the
/// store's atomic increment. A link whose `expires_at` lies in the past is
/// logically dead even while its row still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShortLink {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub is_custom: bool,
}

impl ShortLink {
    /// Creates a fresh link with a zero click count.
    pub fn new(
        code: String,
        target_url: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        is_custom: bool,
    ) -> Self {
        Self {
            code,
            target_url,
            created_at,
            expires_at,
            click_count: 0,
            is_custom,
        }
    }

    /// Returns true if the link had expired at `now`.
    ///
    /// Expiry is inclusive: a link whose `expires_at == now` is already dead.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Aggregate counters over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkSummary {
    pub total_links: i64,
    pub total_clicks: i64,
    pub active_links: i64,
}
