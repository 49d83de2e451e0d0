#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use shortlink::application::services::LinkService;
use shortlink::domain::hit_worker::run_hit_worker;
use shortlink::domain::repositories::UrlRepository;
use shortlink::infrastructure::cache::NullCache;
use shortlink::infrastructure::persistence::InMemoryUrlRepository;
use shortlink::state::AppState;
use tokio::sync::mpsc;

pub const TEST_BASE_URL: &str = "https://s.test";

/// Builds an `AppState` over the in-memory repository and `NullCache`, with
/// a live hit worker, so handler tests run without Postgres or Redis.
pub fn create_test_state() -> (AppState, Arc<InMemoryUrlRepository>) {
    create_test_state_with_next_id(1)
}

/// Same as [`create_test_state`], but pins the id the store assigns next.
pub fn create_test_state_with_next_id(next_id: i64) -> (AppState, Arc<InMemoryUrlRepository>) {
    let repo = Arc::new(InMemoryUrlRepository::with_next_id(next_id));
    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(run_hit_worker(rx, repo.clone() as Arc<dyn UrlRepository>));

    let state = AppState::new(
        repo.clone(),
        Arc::new(NullCache),
        tx,
        TEST_BASE_URL.to_string(),
    );

    (state, repo)
}

/// Creates a link directly through the service and returns its code.
pub async fn create_test_link(state: &AppState, url: &str) -> String {
    state.link_service.create_short_link(url).await.unwrap()
}

/// Polls until the access count for `id` reaches `expected`, or panics.
///
/// The increment is applied by the background worker, so tests observe it
/// eventually rather than immediately.
pub async fn wait_for_access_count(repo: &InMemoryUrlRepository, id: i64, expected: i64) {
    for _ in 0..100 {
        let count = repo
            .find_stats(id)
            .await
            .unwrap()
            .map(|record| record.access_count)
            .unwrap_or(0);
        if count >= expected {
            assert_eq!(count, expected);
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("access count for id {id} never reached {expected}");
}
