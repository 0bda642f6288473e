//! API route configuration.

use crate::api::handlers::{cleanup_handler, dashboard_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All JSON API routes.
///
/// # Endpoints
///
/// - `POST /shorten`       - Create a short link
/// - `GET  /stats/{code}`  - Stored record and click count for one link
/// - `GET  /dashboard`     - Store-wide counters and the newest links
/// - `POST /cleanup`       - Run one expiry sweep now
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/cleanup", post(cleanup_handler))
}
