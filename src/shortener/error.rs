use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShortenerError {
    #[error("URL cannot be empty")]
    Validation,
    #[error("short id '{0}' not found")]
    NotFound(String),
    #[error("no free short id after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error("storage failure: {0}")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for ShortenerError {
    fn from(err: StorageError) -> Self {
        ShortenerError::Storage(err)
    }
}
