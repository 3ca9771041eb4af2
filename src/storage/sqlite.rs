use crate::models::UrlRecord;
use crate::storage::{map_insert_error, other, ConflictKind, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(other)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(other)?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                long_url TEXT NOT NULL UNIQUE,
                short_id TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await
        .map_err(other)?;

        Ok(())
    }

    async fn find_by_long_url(&self, long_url: &str) -> StorageResult<Option<UrlRecord>> {
        let url = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, long_url, short_id
            FROM urls
            WHERE long_url = ?
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(other)?;

        Ok(url)
    }

    async fn find_by_short_id(&self, short_id: &str) -> StorageResult<Option<UrlRecord>> {
        let url = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, long_url, short_id
            FROM urls
            WHERE short_id = ?
            "#,
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(other)?;

        Ok(url)
    }

    async fn insert_if_absent(&self, long_url: &str, short_id: &str) -> StorageResult<UrlRecord> {
        let inserted = sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (long_url, short_id)
            VALUES (?, ?)
            ON CONFLICT(short_id) DO NOTHING
            RETURNING id, long_url, short_id
            "#,
        )
        .bind(long_url)
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_insert_error)?;

        inserted.ok_or(StorageError::Conflict(ConflictKind::ShortId))
    }

    async fn list(&self, limit: i64, offset: i64) -> StorageResult<Vec<UrlRecord>> {
        let urls = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, long_url, short_id
            FROM urls
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(other)?;

        Ok(urls)
    }

    async fn count(&self) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(other)?;

        Ok(count)
    }
}
