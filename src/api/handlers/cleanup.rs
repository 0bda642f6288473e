//! Handler for on-demand expiry sweeps.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::application::services::SweepReport;
use crate::error::AppError;
use crate::state::AppState;

/// Runs one expiry sweep immediately.
///
/// # Endpoint
///
/// `POST /api/cleanup`
///
/// # Response
///
/// ```json
/// { "scanned": 3, "deleted": 3, "failed": 0, "skipped": false }
/// ```
///
/// `skipped` is true when a periodic sweep was already running.
pub async fn cleanup_handler(State(state): State<AppState>) -> Result<Json<SweepReport>, AppError> {
    let report = state.sweeper.sweep_once(Utc::now()).await?;
    Ok(Json(report))
}
