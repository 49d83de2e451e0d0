//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache capability for short code to URL mappings.
///
/// The cache is a best-effort accelerator, never an authority: entries may
/// be absent or silently lost, and the store remains the source of truth.
/// Implementations are fail-open - a backend error on read is reported as a
/// miss and a backend error on write is logged and swallowed, so an outage
/// degrades to store-only behavior instead of failing requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed
/// - [`crate::infrastructure::cache::NullCache`] - no-op fallback
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the original URL for a short code.
    ///
    /// Returns `Ok(Some(url))` on a hit; `Ok(None)` on a miss *or* on a
    /// backend error, which callers treat identically (both fall through to
    /// the store).
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a code to URL mapping with no expiration.
    ///
    /// Implementations log failures and return `Ok(())` so a cache outage
    /// never disrupts the request flow.
    async fn set_url(&self, short_code: &str, long_url: &str) -> CacheResult<()>;

    /// Reports whether the cache backend is reachable.
    ///
    /// Used by the health endpoint only.
    async fn health_check(&self) -> bool;
}
