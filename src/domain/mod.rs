//! Domain layer: entities, repository contracts, and the hit-tracking
//! worker.

pub mod entities;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
