//! Router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`       - Create a short link
//! - `GET  /{code}`        - Short link redirect
//! - `GET  /stats/{code}`  - Access statistics for a link
//! - `GET  /health`        - Health check: DB, cache, hit queue
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler, stats_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// `/health`, `/shorten`, and `/stats` are registered before the `{code}`
/// catch-all; axum matches the literal segments first, so those paths are
/// effectively reserved and can never shadow a short code.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/shorten", post(shorten_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
