//! DTOs for link statistics.

use serde::Serialize;

/// Statistics for a short link, read straight from the durable store.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub long_url: String,
    pub short_code: String,
    pub access_count: i64,
}
