//! Handlers for health check and service info endpoints.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, InfoResponse};
use crate::state::AppState;

/// Upper bound for the storage probe.
const STORAGE_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Storage**: Store ping
/// 2. **Click Queue**: Checks if channel is open and reports free slots
/// 3. **Cache**: Redis PING (always ok when caching is disabled)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Reachable" },
///     "click_queue": { "status": "ok", "message": "Free slots: 10000/10000, deferred: 0" },
///     "cache": { "status": "ok", "message": "redis connected" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let click_queue = check_click_queue(&state);
    let cache = check_cache(&state).await;

    let all_healthy = storage.is_ok() && click_queue.is_ok() && cache.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            click_queue,
            cache,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match tokio::time::timeout(STORAGE_PING_TIMEOUT, state.repository.ping()).await {
        Ok(Ok(())) => CheckStatus::ok("Reachable"),
        Ok(Err(e)) => CheckStatus::error(e.to_string()),
        Err(_) => CheckStatus::error("Storage ping timed out"),
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    let clicks = state.resolution.clicks();
    if clicks.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Free slots: {}/{}, deferred: {}",
            clicks.capacity(),
            clicks.max_capacity(),
            clicks.deferred()
        ))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend_name();
    if state.cache.health_check().await {
        CheckStatus::ok(format!("{backend} connected"))
    } else {
        CheckStatus::error(format!("{backend} connection failed"))
    }
}

/// Service name, version and endpoint listing.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: [
            "POST /api/shorten",
            "GET /{code}",
            "GET /api/stats/{code}",
            "GET /api/dashboard",
            "POST /api/cleanup",
            "GET /health",
            "GET /metrics",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    })
}
