//! Shared utilities.

pub mod base62;
