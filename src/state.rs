//! Shared application state injected into all handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;

/// Per-process shared state.
///
/// The repository, cache, and sender handles are kept alongside the service
/// so the health endpoint can probe each component directly.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub url_repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
    pub hit_sender: mpsc::Sender<HitEvent>,
    pub base_url: String,
}

impl AppState {
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        hit_sender: mpsc::Sender<HitEvent>,
        base_url: String,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            url_repository.clone(),
            cache.clone(),
            hit_sender.clone(),
        ));

        Self {
            link_service,
            url_repository,
            cache,
            hit_sender,
            base_url,
        }
    }
}
