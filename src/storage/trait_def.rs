use crate::models::UrlRecord;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Which uniqueness constraint rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// The candidate short ID is already assigned to another record.
    ShortId,
    /// Another record already holds this long URL.
    LongUrl,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::ShortId => f.write_str("short id"),
            ConflictKind::LongUrl => f.write_str("long url"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} already exists")]
    Conflict(ConflictKind),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorageError {
    pub fn is_conflict(&self, kind: ConflictKind) -> bool {
        matches!(self, StorageError::Conflict(k) if *k == kind)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Transactional persistence for URL records.
///
/// `insert_if_absent` is the only write path. Backends must enforce
/// uniqueness of both `short_id` and `long_url` themselves so that racing
/// inserts resolve to exactly one winner per key.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create the schema if it does not exist)
    async fn init(&self) -> StorageResult<()>;

    /// Exact-match lookup by long URL
    async fn find_by_long_url(&self, long_url: &str) -> StorageResult<Option<UrlRecord>>;

    /// Exact-match lookup by short ID
    async fn find_by_short_id(&self, short_id: &str) -> StorageResult<Option<UrlRecord>>;

    /// Atomically insert a new record.
    ///
    /// Fails with `Conflict(ShortId)` if `short_id` is taken and with
    /// `Conflict(LongUrl)` if `long_url` already has a record. Either way
    /// nothing is written.
    async fn insert_if_absent(&self, long_url: &str, short_id: &str) -> StorageResult<UrlRecord>;

    /// List records in insertion order
    async fn list(&self, limit: i64, offset: i64) -> StorageResult<Vec<UrlRecord>>;

    /// Total number of records
    async fn count(&self) -> StorageResult<i64>;
}
