//! Core link entity.

use serde::{Deserialize, Serialize};

/// A stored short link row: `urls(id, long_url, access_count)`.
///
/// `id` is assigned by the database on insert and never reused. `long_url`
/// is immutable after creation. `access_count` only moves forward and is
/// mutated exclusively by the background hit worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: i64,
    pub long_url: String,
    pub access_count: i64,
}

impl UrlRecord {
    pub fn new(id: i64, long_url: String, access_count: i64) -> Self {
        Self {
            id,
            long_url,
            access_count,
        }
    }
}
