//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/very/long/path",
///   "custom_code": "promo",   // optional
///   "ttl_seconds": 3600       // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "promo",
///   "short_url": "https://s.example.com/promo",
///   "target_url": "https://example.com/very/long/path",
///   "created_at": "2025-01-01T00:00:00Z",
///   "expires_at": "2025-01-01T01:00:00Z",
///   "is_custom": true
/// }
/// ```
///
/// # Errors
///
/// - 400 for malformed bodies, invalid URLs, aliases or TTLs
/// - 409 if the custom code is taken
/// - 503 if no code could be allocated or storage is unavailable
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .shortening
        .shorten(
            &payload.url,
            payload.custom_code.as_deref(),
            payload.ttl_seconds,
        )
        .await?;

    let short_url = state.shortening.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::new(link, short_url)),
    ))
}
