//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response
///
/// `302 Found` with the target in `Location`. The click is counted in the
/// background and never delays the response.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or the link has expired.
/// Returns 400 Bad Request if the stored target cannot be sent as a header.
/// Returns 503 Service Unavailable if storage cannot be reached.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target_url = state.resolution.resolve(&code).await?;

    let location = HeaderValue::try_from(target_url).map_err(|e| {
        tracing::error!(%code, error = %e, "Stored target is not a valid Location header");
        AppError::invalid_url(format!("target of '{code}' cannot be used as a redirect"))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
