use crate::models::UrlRecord;
use crate::storage::{map_insert_error, other, ConflictKind, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(other)?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                id BIGSERIAL PRIMARY KEY,
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
            WHERE long_url = $1
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
            WHERE short_id = $1
            "#,
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(other)?;

        Ok(url)
    }

    async fn insert_if_absent(&self, long_url: &str, short_id: &str) -> StorageResult<UrlRecord> {
        // A concurrent insert of the same long_url blocks on the unique
        // index until the first transaction settles, then fails here.
        let inserted = sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (long_url, short_id)
            VALUES ($1, $2)
            ON CONFLICT (short_id) DO NOTHING
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
            LIMIT $1 OFFSET $2
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
