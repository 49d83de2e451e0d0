//! Request/response DTOs for the HTTP API.

pub mod health;
pub mod shorten;
pub mod stats;
