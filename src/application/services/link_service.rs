//! Link creation, resolution, and stats service.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::domain::entities::UrlRecord;
use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::base62;

/// Orchestrates the codec, the store, and the cache.
///
/// Owns the cache-aside policy: reads consult the cache first and fall back
/// to the store, repopulating the cache afterward; creates write to the
/// store and prime the cache best-effort. Successful resolutions enqueue a
/// hit event on a bounded channel; the increment itself runs in the hit
/// worker, outside any request's lifetime.
///
/// The service holds no mutable state and takes no locks, so a single
/// instance is shared across all requests.
pub struct LinkService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    hit_sender: mpsc::Sender<HitEvent>,
}

impl LinkService {
    /// Creates a new link service over the injected capabilities.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        hit_sender: mpsc::Sender<HitEvent>,
    ) -> Self {
        Self {
            repository,
            cache,
            hit_sender,
        }
    }

    /// Creates a short link for an already-validated absolute URL.
    ///
    /// Inserts the URL, encodes the assigned id as the short code, and
    /// primes the cache. A cache write failure is logged and swallowed; it
    /// never fails the create.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store insert fails. No partial
    /// state is possible: an id is either committed with its row or not
    /// created at all.
    pub async fn create_short_link(&self, long_url: &str) -> Result<String, AppError> {
        let id = self.repository.create(long_url).await?;
        let code = base62::encode(id as u64);

        if let Err(e) = self.cache.set_url(&code, long_url).await {
            warn!(code = %code, error = %e, "failed to prime cache for new link");
        }

        debug!(code = %code, id, "created short link");
        Ok(code)
    }

    /// Resolves a short code to its original URL.
    ///
    /// Decode failures fail fast before any I/O. A cache miss and a cache
    /// error both fall through to the store; a store hit after a miss
    /// repopulates the cache best-effort. Every successful resolution
    /// enqueues one hit event, without waiting on it.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidCode`] if the code violates the alphabet
    /// - [`AppError::NotFound`] if no record backs the code
    /// - [`AppError::Internal`] if the store fails after a cache miss
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let id = decode_link_id(code)?;

        let long_url = match self.cache.get_url(code).await {
            Ok(Some(cached_url)) => cached_url,
            // A miss and a cache error both fall through to the store.
            _ => {
                let long_url = self
                    .repository
                    .find_long_url(id)
                    .await?
                    .ok_or_else(|| not_found(code))?;

                if let Err(e) = self.cache.set_url(code, &long_url).await {
                    warn!(code = %code, error = %e, "failed to repopulate cache");
                }

                long_url
            }
        };

        self.dispatch_hit(id);
        Ok(long_url)
    }

    /// Fetches the durable record for a short code, access count included.
    ///
    /// Deliberately bypasses the cache: stats must reflect current durable
    /// state, not a stale projection.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::resolve`].
    pub async fn get_stats(&self, code: &str) -> Result<UrlRecord, AppError> {
        let id = decode_link_id(code)?;

        self.repository
            .find_stats(id)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// Enqueues a hit event without blocking.
    ///
    /// The channel is bounded; under load the event is dropped with a
    /// warning rather than stalling the resolve path or spawning unbounded
    /// work. The caller never observes the outcome.
    fn dispatch_hit(&self, link_id: i64) {
        match self.hit_sender.try_send(HitEvent::new(link_id)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(link_id, "hit queue full, dropping hit event");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(link_id, "hit queue closed, dropping hit event");
            }
        }
    }
}

/// Decodes a short code into a storable id.
///
/// Codes are base-62 over `u64`, but the store only ever assigns positive
/// `i64` ids, so a decoded value beyond that range cannot have a backing
/// row and is reported as not found before any I/O.
fn decode_link_id(code: &str) -> Result<i64, AppError> {
    let raw = base62::decode(code)?;
    i64::try_from(raw).map_err(|_| not_found(code))
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hit_worker::run_hit_worker;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService, NullCache};
    use crate::infrastructure::persistence::InMemoryUrlRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    fn hit_channel() -> (mpsc::Sender<HitEvent>, mpsc::Receiver<HitEvent>) {
        mpsc::channel(16)
    }

    fn service(
        repo: MockUrlRepository,
        cache: MockCacheService,
    ) -> (LinkService, mpsc::Receiver<HitEvent>) {
        let (tx, rx) = hit_channel();
        (LinkService::new(Arc::new(repo), Arc::new(cache), tx), rx)
    }

    #[tokio::test]
    async fn create_encodes_the_assigned_id() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(125));

        let mut cache = MockCacheService::new();
        cache
            .expect_set_url()
            .withf(|code, url| code == "21" && url == "https://example.com")
            .times(1)
            .returning(|_, _| Ok(()));

        let (service, _rx) = service(repo, cache);
        let code = service.create_short_link("https://example.com").await.unwrap();
        assert_eq!(code, "21");
    }

    #[tokio::test]
    async fn create_swallows_cache_write_failures() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create().times(1).returning(|_| Ok(7));

        let mut cache = MockCacheService::new();
        cache
            .expect_set_url()
            .times(1)
            .returning(|_, _| Err(CacheError::OperationError("redis down".into())));

        let (service, _rx) = service(repo, cache);
        let code = service.create_short_link("https://example.com").await.unwrap();
        assert_eq!(code, "7");
    }

    #[tokio::test]
    async fn create_propagates_store_failures() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("insert failed", json!({}))));

        let mut cache = MockCacheService::new();
        cache.expect_set_url().times(0);

        let (service, _rx) = service(repo, cache);
        let err = service
            .create_short_link("https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn resolve_uses_cached_value_without_touching_the_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_long_url().times(0);

        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .withf(|code| code == "21")
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));
        cache.expect_set_url().times(0);

        let (service, mut rx) = service(repo, cache);
        let url = service.resolve("21").await.unwrap();
        assert_eq!(url, "https://example.com");

        // A cache hit still counts as an access.
        assert_eq!(rx.try_recv().unwrap(), HitEvent::new(125));
    }

    #[tokio::test]
    async fn resolve_falls_back_to_store_and_repopulates_cache_once() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_long_url()
            .withf(|id| *id == 125)
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));

        let mut cache = MockCacheService::new();
        cache.expect_get_url().times(1).returning(|_| Ok(None));
        cache
            .expect_set_url()
            .withf(|code, url| code == "21" && url == "https://example.com")
            .times(1)
            .returning(|_, _| Ok(()));

        let (service, mut rx) = service(repo, cache);
        let url = service.resolve("21").await.unwrap();
        assert_eq!(url, "https://example.com");
        assert_eq!(rx.try_recv().unwrap(), HitEvent::new(125));
    }

    #[tokio::test]
    async fn resolve_reports_not_found_for_unknown_ids() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_long_url().times(1).returning(|_| Ok(None));

        let mut cache = MockCacheService::new();
        cache.expect_get_url().times(1).returning(|_| Ok(None));
        cache.expect_set_url().times(0);

        let (service, mut rx) = service(repo, cache);
        let err = service.resolve("21").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        // A failed resolution counts nothing.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn resolve_rejects_invalid_codes_before_any_io() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_long_url().times(0);

        let mut cache = MockCacheService::new();
        cache.expect_get_url().times(0);
        cache.expect_set_url().times(0);

        let (service, mut rx) = service(repo, cache);
        let err = service.resolve("abc!@#").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCode { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn resolve_treats_out_of_range_ids_as_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_long_url().times(0);

        let mut cache = MockCacheService::new();
        cache.expect_get_url().times(0);

        let (service, _rx) = service(repo, cache);

        // Valid base-62, but beyond what the store can ever assign.
        let code = base62::encode(u64::MAX);
        let err = service.resolve(&code).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn stats_bypass_the_cache_entirely() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_stats()
            .withf(|id| *id == 125)
            .times(1)
            .returning(|_| Ok(Some(UrlRecord::new(125, "https://example.com".into(), 3))));

        let mut cache = MockCacheService::new();
        cache.expect_get_url().times(0);
        cache.expect_set_url().times(0);

        let (service, _rx) = service(repo, cache);
        let record = service.get_stats("21").await.unwrap();
        assert_eq!(record.access_count, 3);
        assert_eq!(record.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn stats_report_not_found_for_unknown_ids() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_stats().times(1).returning(|_| Ok(None));

        let cache = MockCacheService::new();

        let (service, _rx) = service(repo, cache);
        let err = service.get_stats("21").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    /// Repository whose increment is deliberately slow, to prove the
    /// resolve path never waits on it.
    struct SlowIncrementRepository {
        long_url: String,
        increment_done: AtomicBool,
        increment_finished: Notify,
    }

    #[async_trait]
    impl UrlRepository for SlowIncrementRepository {
        async fn create(&self, _long_url: &str) -> Result<i64, AppError> {
            unimplemented!("not used in this test")
        }

        async fn find_long_url(&self, _id: i64) -> Result<Option<String>, AppError> {
            Ok(Some(self.long_url.clone()))
        }

        async fn find_stats(&self, _id: i64) -> Result<Option<UrlRecord>, AppError> {
            unimplemented!("not used in this test")
        }

        async fn increment_access_count(&self, _id: i64) -> Result<(), AppError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            self.increment_done.store(true, Ordering::SeqCst);
            self.increment_finished.notify_one();
            Ok(())
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn resolve_returns_before_a_slow_increment_completes() {
        let repo = Arc::new(SlowIncrementRepository {
            long_url: "https://example.com".to_string(),
            increment_done: AtomicBool::new(false),
            increment_finished: Notify::new(),
        });

        let (tx, rx) = hit_channel();
        tokio::spawn(run_hit_worker(rx, repo.clone()));

        let service = LinkService::new(repo.clone(), Arc::new(NullCache), tx);

        let url = service.resolve("21").await.unwrap();
        assert_eq!(url, "https://example.com");

        // The worker is still inside the slow increment.
        assert!(!repo.increment_done.load(Ordering::SeqCst));

        timeout(Duration::from_secs(2), repo.increment_finished.notified())
            .await
            .expect("increment should complete independently of the caller");
        assert!(repo.increment_done.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn end_to_end_create_then_cold_resolve_then_stats() {
        let repo = Arc::new(InMemoryUrlRepository::with_next_id(125));
        let (tx, rx) = hit_channel();
        tokio::spawn(run_hit_worker(rx, repo.clone()));

        let service = LinkService::new(repo.clone(), Arc::new(NullCache), tx);

        let code = service.create_short_link("https://example.com").await.unwrap();
        assert_eq!(code, "21");

        // NullCache is always cold, so this falls through to the store.
        let url = service.resolve("21").await.unwrap();
        assert_eq!(url, "https://example.com");

        // Eventual consistency: poll until the worker applied the hit.
        let mut count = 0;
        for _ in 0..50 {
            count = repo.find_stats(125).await.unwrap().unwrap().access_count;
            if count == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(count, 1, "exactly one increment for id 125");

        let record = service.get_stats("21").await.unwrap();
        assert_eq!(record.id, 125);
        assert_eq!(record.long_url, "https://example.com");
        assert_eq!(record.access_count, 1);
    }
}
