//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`          - Landing page with a shorten form
//! - `POST /shorten`   - Create a short link
//! - `GET  /stats`     - Aggregate usage statistics
//! - `GET  /health`    - Store connectivity check
//! - `GET  /{code}`    - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler, stats_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web::handlers::index_handler;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Application routes without middleware applied.
///
/// Static routes win over the `/{code}` capture, so a code can never shadow
/// `/shorten`, `/stats`, or `/health`. Kept separate from [`app_router`] so
/// integration tests can mount the routes directly.
pub fn base_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/shorten", post(shorten_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = base_router().with_state(state).layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
