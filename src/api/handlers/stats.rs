//! Handler for link statistics.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Retrieves access statistics for a short link.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// The count is read from the durable store, never the cache, so it
/// reflects committed increments. A resolve that just happened may not be
/// visible yet; that staleness window is part of the contract.
///
/// # Errors
///
/// Returns 400 Bad Request for codes outside the base-62 alphabet.
/// Returns 404 Not Found if no link backs the code.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let record = state.link_service.get_stats(&code).await?;

    Ok(Json(StatsResponse {
        long_url: record.long_url,
        short_code: code,
        access_count: record.access_count,
    }))
}
