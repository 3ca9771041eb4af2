use crate::models::UrlRecord;
use crate::storage::{ConflictKind, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Process-local storage backed by two concurrent maps.
///
/// Inserts lock the `long_url` entry before the `short_id` entry and hold
/// both until the record is visible, so racing inserts on either key have
/// exactly one winner. Lookups never hold a guard on one map while
/// touching the other.
pub struct MemoryStorage {
    /// Records keyed by short ID
    by_short_id: DashMap<String, UrlRecord>,
    /// Short ID keyed by long URL
    by_long_url: DashMap<String, String>,
    next_id: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            by_short_id: DashMap::new(),
            by_long_url: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn find_by_long_url(&self, long_url: &str) -> StorageResult<Option<UrlRecord>> {
        let short_id = match self.by_long_url.get(long_url) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };
        Ok(self
            .by_short_id
            .get(&short_id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_short_id(&self, short_id: &str) -> StorageResult<Option<UrlRecord>> {
        Ok(self
            .by_short_id
            .get(short_id)
            .map(|entry| entry.value().clone()))
    }

    async fn insert_if_absent(&self, long_url: &str, short_id: &str) -> StorageResult<UrlRecord> {
        let long_slot = match self.by_long_url.entry(long_url.to_string()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(ConflictKind::LongUrl)),
            Entry::Vacant(slot) => slot,
        };
        let short_slot = match self.by_short_id.entry(short_id.to_string()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(ConflictKind::ShortId)),
            Entry::Vacant(slot) => slot,
        };

        let record = UrlRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            long_url: long_url.to_string(),
            short_id: short_id.to_string(),
        };
        short_slot.insert(record.clone());
        long_slot.insert(short_id.to_string());

        Ok(record)
    }

    async fn list(&self, limit: i64, offset: i64) -> StorageResult<Vec<UrlRecord>> {
        let mut records: Vec<UrlRecord> = self
            .by_short_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);

        Ok(records
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> StorageResult<i64> {
        Ok(self.by_short_id.len() as i64)
    }
}
