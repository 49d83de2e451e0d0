//! Hit event model for asynchronous access counting.

/// A single successful resolution, queued for counting.
///
/// Produced by the link service on every successful resolve and consumed by
/// [`crate::domain::hit_worker::run_hit_worker`]. Passing the numeric id
/// (not the code) means the worker never has to decode anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitEvent {
    pub link_id: i64,
}

impl HitEvent {
    pub fn new(link_id: i64) -> Self {
        Self { link_id }
    }
}
