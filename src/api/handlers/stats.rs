//! Handlers for link statistics and the dashboard.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::dto::stats::{DashboardResponse, StatsResponse};
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_DASHBOARD_LIMIT: i64 = 20;
const MAX_DASHBOARD_LIMIT: i64 = 100;

/// Retrieves the stored record and click count for a short link.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// Expired links are still reported (with `is_active: false`) until the
/// sweeper removes them.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let link = state.stats.get_stats(&code).await?;
    let short_url = state.shortening.short_url(&link.code);

    Ok(Json(StatsResponse::new(link, short_url, Utc::now())))
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub limit: Option<i64>,
}

/// Store-wide counters and the newest links.
///
/// # Endpoint
///
/// `GET /api/dashboard?limit=20`
///
/// `limit` defaults to 20 and is capped at 100.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardResponse>, AppError> {
    let limit = match params.limit {
        None => DEFAULT_DASHBOARD_LIMIT,
        Some(n) if (1..=MAX_DASHBOARD_LIMIT).contains(&n) => n,
        Some(n) => {
            return Err(AppError::invalid_request(format!(
                "limit must be between 1 and {MAX_DASHBOARD_LIMIT}, got {n}"
            )));
        }
    };

    let now = Utc::now();
    let dashboard = state.stats.dashboard(limit, now).await?;

    let recent = dashboard
        .recent
        .into_iter()
        .map(|link| {
            let short_url = state.shortening.short_url(&link.code);
            StatsResponse::new(link, short_url, now)
        })
        .collect();

    Ok(Json(DashboardResponse {
        total_links: dashboard.summary.total_links,
        total_clicks: dashboard.summary.total_clicks,
        active_links: dashboard.summary.active_links,
        recent,
    }))
}
