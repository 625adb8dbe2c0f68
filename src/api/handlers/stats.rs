//! Handler for the usage statistics endpoint.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns aggregate usage statistics for this instance's store.
///
/// # Endpoint
///
/// `GET /stats`
///
/// # Response
///
/// ```json
/// {
///   "total_urls": 42,
///   "total_clicks": 1337,
///   "top_urls": [
///     {
///       "short_code": "abc123",
///       "long_url": "https://example.com",
///       "access_count": 250
///     }
///   ],
///   "instance_id": "web-1"
/// }
/// ```
///
/// `top_urls` holds at most five entries, most visited first. Links tied on
/// access count are ordered oldest first.
///
/// # Errors
///
/// Returns 500 Internal Server Error if the store cannot be queried.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let overview = state.stats_service.overview().await?;

    Ok(Json(StatsResponse::from_overview(
        overview,
        state.instance_id.clone(),
    )))
}
