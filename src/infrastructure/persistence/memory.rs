//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// HashMap-backed repository for tests and cache-less development.
///
/// Ids are assigned from an atomic counter, mirroring the database's
/// never-reused sequence. The mutex is only held for map access, never
/// across an await point.
pub struct InMemoryUrlRepository {
    rows: Mutex<HashMap<i64, StoredUrl>>,
    next_id: AtomicI64,
}

struct StoredUrl {
    long_url: String,
    access_count: i64,
}

impl InMemoryUrlRepository {
    /// Creates an empty repository assigning ids from 1.
    pub fn new() -> Self {
        Self::with_next_id(1)
    }

    /// Creates an empty repository whose first insert receives `next_id`.
    ///
    /// Lets tests pin the ids the store will assign.
    pub fn with_next_id(next_id: i64) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(next_id),
        }
    }
}

impl Default for InMemoryUrlRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, long_url: &str) -> Result<i64, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().insert(
            id,
            StoredUrl {
                long_url: long_url.to_string(),
                access_count: 0,
            },
        );
        Ok(id)
    }

    async fn find_long_url(&self, id: i64) -> Result<Option<String>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .map(|row| row.long_url.clone()))
    }

    async fn find_stats(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .map(|row| UrlRecord::new(id, row.long_url.clone(), row.access_count)))
    }

    async fn increment_access_count(&self, id: i64) -> Result<(), AppError> {
        if let Some(row) = self.rows.lock().unwrap().get_mut(&id) {
            row.access_count += 1;
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
