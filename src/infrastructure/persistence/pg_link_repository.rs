//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LinkSummary, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "code, target_url, created_at, expires_at, click_count, is_custom";

/// PostgreSQL repository for short links.
///
/// Atomicity is delegated to the database: `put` relies on the primary key
/// with `ON CONFLICT DO NOTHING`, and `increment_clicks` is a single
/// `click_count = click_count + 1` update.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn put(&self, link: ShortLink) -> Result<ShortLink, AppError> {
        let query = format!(
            r#"
            INSERT INTO short_links (code, target_url, created_at, expires_at, click_count, is_custom)
            VALUES ($1, $2, $3, $4, 0, $5)
            ON CONFLICT (code) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, ShortLink>(&query)
            .bind(&link.code)
            .bind(&link.target_url)
            .bind(link.created_at)
            .bind(link.expires_at)
            .bind(link.is_custom)
            .fetch_optional(self.pool.as_ref())
            .await?;

        inserted.ok_or_else(|| AppError::code_exists(link.code))
    }

    async fn get(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let query = format!("SELECT {LINK_COLUMNS} FROM short_links WHERE code = $1");

        let link = sqlx::query_as::<_, ShortLink>(&query)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM short_links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn increment_clicks(&self, code: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE short_links SET click_count = click_count + 1 WHERE code = $1")
                .bind(code)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM short_links WHERE code = $1 AND expires_at IS NOT NULL AND expires_at <= $2",
        )
        .bind(code)
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError> {
        let codes: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT code
            FROM short_links
            WHERE expires_at IS NOT NULL AND expires_at <= $1
            ORDER BY expires_at
            "#,
        )
        .bind(now)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(codes)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM short_links ORDER BY created_at DESC LIMIT $1"
        );

        let links = sqlx::query_as::<_, ShortLink>(&query)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(links)
    }

    async fn summary(&self, now: DateTime<Utc>) -> Result<LinkSummary, AppError> {
        let (total_links, total_clicks, active_links): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(click_count), 0)::BIGINT,
                COUNT(*) FILTER (WHERE expires_at IS NULL OR expires_at > $1)
            FROM short_links
            "#,
        )
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LinkSummary {
            total_links,
            total_clicks,
            active_links,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
