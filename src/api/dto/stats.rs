//! DTOs for per-link statistics and the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ShortLink;

/// Stored record and click counter for one short link.
///
/// `is_active` is false once the link has expired, even if the sweeper has
/// not removed it yet.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub code: String,
    pub short_url: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub is_custom: bool,
    pub is_active: bool,
}

impl StatsResponse {
    pub fn new(link: ShortLink, short_url: String, now: DateTime<Utc>) -> Self {
        let is_active = !link.is_expired_at(now);
        Self {
            code: link.code,
            short_url,
            target_url: link.target_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            click_count: link.click_count,
            is_custom: link.is_custom,
            is_active,
        }
    }
}

/// Store-wide counters plus the newest links.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub total_links: i64,
    pub total_clicks: i64,
    pub active_links: i64,
    pub recent: Vec<StatsResponse>,
}
