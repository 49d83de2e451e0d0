//! Application layer: business logic orchestration.

pub mod services;
