//! Domain entities.

mod link;

pub use link::UrlRecord;
