//! Top-level router configuration combining API and redirect routes.
//!
//! # Route Structure
//!
//! - `GET  /`            - Service info and endpoint listing
//! - `GET  /{code}`      - Short link redirect
//! - `GET  /health`      - Health check: storage, cache, click queue
//! - `GET  /metrics`     - Prometheus scrape endpoint
//! - `/api/*`            - REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, index_handler, metrics_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with request tracing, before path normalization.
///
/// Static paths (`/health`, `/metrics`, `/api/...`) take precedence over the `/{code}`
/// capture, so a short code can never shadow them.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
