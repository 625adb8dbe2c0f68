//! Handler for link shortening endpoint.

use axum::{Json, extract::State};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shortened URL, or returns the existing one for a known URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_url": "http://localhost:5000/abc123",
///   "long_url": "https://example.com/some/long/path",
///   "short_code": "abc123"
/// }
/// ```
///
/// Shortening the same URL again returns the original code, so the endpoint
/// can be retried safely.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing, empty, or malformed.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    let long_url = payload.url.unwrap_or_default();

    let link = state.shortener_service.shorten(&long_url).await?;

    let short_url = state.short_url(&link.code);

    Ok(Json(ShortenResponse {
        short_url,
        long_url: link.long_url,
        short_code: link.code,
    }))
}
