//! Repository trait for short link storage.

use crate::domain::entities::UrlRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Store capability for link rows.
///
/// The service layer depends on this trait only; implementations own all
/// connection handling. The durable store is the source of truth for link
/// data - cache entries are a derived projection of it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - tests
///   and cache-less development
/// - `MockUrlRepository` - generated with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new link and returns the id the store assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors. An id is either
    /// fully committed with its row or not created at all.
    async fn create(&self, long_url: &str) -> Result<i64, AppError>;

    /// Looks up the original URL for an id.
    ///
    /// Returns `Ok(None)` if no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_long_url(&self, id: i64) -> Result<Option<String>, AppError>;

    /// Fetches the full row for an id, including the access count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_stats(&self, id: i64) -> Result<Option<UrlRecord>, AppError>;

    /// Atomically increments the access count for an id.
    ///
    /// The increment is `access_count = access_count + 1` at the storage
    /// layer, so concurrent increments never lose updates. Incrementing a
    /// missing id is not an error; it simply affects no rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_access_count(&self, id: i64) -> Result<(), AppError>;

    /// Reports whether the backing store is reachable.
    async fn health_check(&self) -> bool;
}
