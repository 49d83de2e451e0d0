//! Storage backends implementing the repository traits.

mod memory;
mod pg_url_repository;

pub use memory::InMemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
