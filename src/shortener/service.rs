use std::sync::Arc;

use tracing::{debug, error, warn};

use super::error::ShortenerError;
use super::generator::{IdGenerator, RandomIdGenerator};
use crate::models::UrlRecord;
use crate::storage::{ConflictKind, Storage, StorageError};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Result of [`Shortener::shorten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub record: UrlRecord,
    /// True only if this call inserted the record.
    pub created: bool,
}

/// Allocates short IDs and resolves them back to long URLs.
///
/// Holds no record state of its own; every call reads through to the
/// store, so concurrent writers are visible immediately.
pub struct Shortener {
    storage: Arc<dyn Storage>,
    generator: Box<dyn IdGenerator>,
    max_attempts: u32,
}

impl Shortener {
    pub fn new(storage: Arc<dyn Storage>, short_id_length: usize, max_attempts: u32) -> Self {
        Self::with_generator(
            storage,
            Box::new(RandomIdGenerator::new(short_id_length)),
            max_attempts,
        )
    }

    pub fn with_generator(
        storage: Arc<dyn Storage>,
        generator: Box<dyn IdGenerator>,
        max_attempts: u32,
    ) -> Self {
        Self {
            storage,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Return the short ID for `long_url`, allocating one on first use.
    ///
    /// Re-shortening an already known URL performs no write. When two
    /// callers race on a new URL the store's `long_url` constraint picks
    /// one winner and the loser returns the winner's record.
    pub async fn shorten(&self, long_url: &str) -> Result<Shortened, ShortenerError> {
        if long_url.trim().is_empty() {
            return Err(ShortenerError::Validation);
        }

        if let Some(record) = self.storage.find_by_long_url(long_url).await? {
            return Ok(Shortened {
                record,
                created: false,
            });
        }

        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            match self.storage.insert_if_absent(long_url, &candidate).await {
                Ok(record) => {
                    debug!(short_id = %record.short_id, attempt, "allocated short id");
                    return Ok(Shortened {
                        record,
                        created: true,
                    });
                }
                Err(StorageError::Conflict(ConflictKind::ShortId)) => {
                    debug!(short_id = %candidate, attempt, "short id collision, retrying");
                }
                Err(StorageError::Conflict(ConflictKind::LongUrl)) => {
                    debug!("concurrent shorten of the same url won, reading its record");
                    return self.existing(long_url).await;
                }
                Err(err) => {
                    error!(error = %err, "failed to insert url record");
                    return Err(err.into());
                }
            }
        }

        warn!(attempts = self.max_attempts, "short id allocation exhausted");
        Err(ShortenerError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Look up the long URL behind `short_id`.
    pub async fn resolve(&self, short_id: &str) -> Result<String, ShortenerError> {
        self.storage
            .find_by_short_id(short_id)
            .await?
            .map(|record| record.long_url)
            .ok_or_else(|| ShortenerError::NotFound(short_id.to_string()))
    }

    async fn existing(&self, long_url: &str) -> Result<Shortened, ShortenerError> {
        match self.storage.find_by_long_url(long_url).await? {
            Some(record) => Ok(Shortened {
                record,
                created: false,
            }),
            // Records are never deleted, so the winner must be readable.
            None => Err(ShortenerError::Storage(StorageError::Other(anyhow::anyhow!(
                "record for conflicting long url is not visible"
            )))),
        }
    }
}

/// Join the configured base with a short ID.
pub fn short_url(base_url: &str, short_id: &str) -> String {
    if base_url.ends_with('/') {
        format!("{base_url}{short_id}")
    } else {
        format!("{base_url}/{short_id}")
    }
}
