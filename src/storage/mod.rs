pub mod memory;
pub mod postgres;
pub mod sqlite;
pub mod trait_def;

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;
pub use sqlite::SqliteStorage;
pub use trait_def::{ConflictKind, Storage, StorageError, StorageResult};

use crate::config::{DatabaseBackend, DatabaseConfig};
use std::sync::Arc;

/// Open the backend selected by `config`. The schema is not created here.
pub async fn connect(config: &DatabaseConfig) -> StorageResult<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.backend {
        DatabaseBackend::Sqlite => {
            tracing::info!("Using SQLite storage: {}", config.url);
            Arc::new(SqliteStorage::new(&config.url, config.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            tracing::info!("Using PostgreSQL storage: {}", config.url);
            Arc::new(PostgresStorage::new(&config.url, config.max_connections).await?)
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on shutdown");
            Arc::new(MemoryStorage::new())
        }
    };
    Ok(storage)
}

/// Translate an insert failure.
///
/// Inserts resolve `short_id` collisions with `ON CONFLICT (short_id) DO
/// NOTHING`, so any unique violation that still reaches us comes from the
/// `long_url` constraint.
fn map_insert_error(err: sqlx::Error) -> StorageError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            return StorageError::Conflict(ConflictKind::LongUrl);
        }
    }
    StorageError::Other(err.into())
}

fn other(err: sqlx::Error) -> StorageError {
    StorageError::Other(err.into())
}
