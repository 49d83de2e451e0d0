//! Background worker that persists access counts.
//!
//! Resolved links enqueue a [`HitEvent`] on a bounded channel; this worker
//! drains it and applies the increments. Running the increments here keeps
//! the resolve path free of write latency, and the worker task outlives any
//! individual request: an aborted client never cancels a pending increment.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::UrlRepository;

/// Consumes hit events until the sending side closes.
///
/// Increment failures are logged and skipped, never retried: the counter is
/// best-effort by contract, and a dropped increment only understates stats.
pub async fn run_hit_worker(
    mut rx: mpsc::Receiver<HitEvent>,
    repository: Arc<dyn UrlRepository>,
) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = repository.increment_access_count(event.link_id).await {
            warn!(link_id = event.link_id, error = %e, "failed to record link hit");
        }
    }

    info!("hit worker stopped: channel closed");
}
