//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// PostgreSQL repository over the `urls` table.
///
/// Queries are bound at runtime so the crate builds without a live
/// database. The pool carries the acquire/idle/lifetime timeouts configured
/// at startup, which bounds how long a foreground call can wait on a slow
/// backend.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, long_url: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "INSERT INTO urls (long_url, access_count) VALUES ($1, 0) RETURNING id",
        )
        .bind(long_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        let id: i64 = row.try_get("id")?;
        Ok(id)
    }

    async fn find_long_url(&self, id: i64) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT long_url FROM urls WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(|r| r.try_get::<String, _>("long_url"))
            .transpose()
            .map_err(AppError::from)
    }

    async fn find_stats(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query("SELECT id, long_url, access_count FROM urls WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(UrlRecord::new(
            row.try_get("id")?,
            row.try_get("long_url")?,
            row.try_get("access_count")?,
        )))
    }

    async fn increment_access_count(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE urls SET access_count = access_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
