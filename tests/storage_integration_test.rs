//! Integration tests for the storage backends
//!
//! Tests can be filtered by database backend using the DATABASE_BACKEND environment variable:
//! - `DATABASE_BACKEND=sqlite cargo test` - Run only SQLite tests
//! - `DATABASE_BACKEND=postgres cargo test -- --test-threads=1` - Run only PostgreSQL
//!   tests against DATABASE_URL (each test recreates the `urls` table)
//! - By default, SQLite and in-memory storage are tested

use snip::storage::{ConflictKind, MemoryStorage, PostgresStorage, SqliteStorage, Storage};
use std::sync::Arc;

/// Get the database backend to test from environment variable
fn should_test_backend(backend: &str) -> bool {
    match std::env::var("DATABASE_BACKEND") {
        Ok(val) => val.to_lowercase() == backend.to_lowercase(),
        Err(_) => true, // Test all backends if not specified
    }
}

/// Helper to create SQLite test storage
async fn create_sqlite_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 5).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Helper to create PostgreSQL test storage with an empty table
async fn create_postgres_storage() -> Option<Arc<dyn Storage>> {
    let db_url = std::env::var("DATABASE_URL").ok()?;
    if !db_url.starts_with("postgres") {
        return None;
    }
    let pool = sqlx::PgPool::connect(&db_url).await.ok()?;
    sqlx::query("DROP TABLE IF EXISTS urls")
        .execute(&pool)
        .await
        .ok()?;
    let storage = PostgresStorage::new(&db_url, 5).await.ok()?;
    storage.init().await.ok()?;
    Some(Arc::new(storage))
}

async fn backends() -> Vec<(&'static str, Arc<dyn Storage>)> {
    let mut backends: Vec<(&'static str, Arc<dyn Storage>)> = vec![];
    if should_test_backend("sqlite") {
        backends.push(("sqlite", create_sqlite_storage().await));
    }
    if should_test_backend("memory") {
        backends.push(("memory", Arc::new(MemoryStorage::new())));
    }
    if std::env::var("DATABASE_BACKEND").is_ok_and(|v| v.eq_ignore_ascii_case("postgres")) {
        if let Some(storage) = create_postgres_storage().await {
            backends.push(("postgres", storage));
        }
    }
    backends
}

async fn check_exact_match_lookups(name: &str, storage: Arc<dyn Storage>) {
    let record = storage
        .insert_if_absent("https://example.com/page1", "aB3xZ9")
        .await
        .unwrap();
    assert_eq!(record.long_url, "https://example.com/page1", "{name}");
    assert_eq!(record.short_id, "aB3xZ9", "{name}");

    let by_long = storage
        .find_by_long_url("https://example.com/page1")
        .await
        .unwrap();
    assert_eq!(by_long.as_ref(), Some(&record), "{name}");

    let by_short = storage.find_by_short_id("aB3xZ9").await.unwrap();
    assert_eq!(by_short.as_ref(), Some(&record), "{name}");

    // no partial or case-insensitive matching
    assert!(storage
        .find_by_long_url("https://example.com/page")
        .await
        .unwrap()
        .is_none());
    assert!(storage.find_by_short_id("ab3xz9").await.unwrap().is_none());
}

#[tokio::test]
async fn test_exact_match_lookups() {
    for (name, storage) in backends().await {
        check_exact_match_lookups(name, storage).await;
    }
}

async fn check_conflicts(name: &str, storage: Arc<dyn Storage>) {
    storage
        .insert_if_absent("https://example.com/a", "same01")
        .await
        .unwrap();

    let err = storage
        .insert_if_absent("https://example.com/b", "same01")
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::ShortId), "{name}: {err:?}");

    let err = storage
        .insert_if_absent("https://example.com/a", "other1")
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::LongUrl), "{name}: {err:?}");

    // rejected inserts leave nothing behind
    assert_eq!(storage.count().await.unwrap(), 1, "{name}");
    assert!(storage.find_by_short_id("other1").await.unwrap().is_none());
    assert!(storage
        .find_by_long_url("https://example.com/b")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_insert_conflicts() {
    for (name, storage) in backends().await {
        check_conflicts(name, storage).await;
    }
}

async fn check_concurrent_same_short_id(name: &str, storage: Arc<dyn Storage>) {
    let mut handles = vec![];

    for i in 0..10 {
        let storage_clone = Arc::clone(&storage);
        let handle = tokio::spawn(async move {
            storage_clone
                .insert_if_absent(&format!("https://example.com/{}", i), "same_id")
                .await
        });
        handles.push(handle);
    }

    // Exactly one should succeed, others should get Conflict error
    let mut success_count = 0;
    let mut conflict_count = 0;

    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => success_count += 1,
            Err(e) => {
                if e.is_conflict(ConflictKind::ShortId) {
                    conflict_count += 1;
                } else {
                    panic!("{name}: unexpected error: {:?}", e);
                }
            }
        }
    }

    assert_eq!(success_count, 1, "{name}: exactly one insert should succeed");
    assert_eq!(conflict_count, 9, "{name}: all others should get conflict");
}

#[tokio::test]
async fn test_concurrent_insert_same_short_id() {
    for (name, storage) in backends().await {
        check_concurrent_same_short_id(name, storage).await;
    }
}

async fn check_concurrent_same_long_url(name: &str, storage: Arc<dyn Storage>) {
    let mut handles = vec![];

    for i in 0..10 {
        let storage_clone = Arc::clone(&storage);
        let handle = tokio::spawn(async move {
            storage_clone
                .insert_if_absent("https://example.com/hot", &format!("hot{:03}", i))
                .await
        });
        handles.push(handle);
    }

    let mut success_count = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => success_count += 1,
            Err(e) => assert!(
                e.is_conflict(ConflictKind::LongUrl),
                "{name}: unexpected error: {:?}",
                e
            ),
        }
    }

    assert_eq!(success_count, 1, "{name}: exactly one insert should succeed");
    assert_eq!(storage.count().await.unwrap(), 1, "{name}");
}

#[tokio::test]
async fn test_concurrent_insert_same_long_url() {
    for (name, storage) in backends().await {
        check_concurrent_same_long_url(name, storage).await;
    }
}

async fn check_list_and_count(name: &str, storage: Arc<dyn Storage>) {
    for i in 0..5 {
        storage
            .insert_if_absent(&format!("https://example.com/{}", i), &format!("id{:04}", i))
            .await
            .unwrap();
    }

    assert_eq!(storage.count().await.unwrap(), 5, "{name}");

    let page = storage.list(2, 2).await.unwrap();
    let ids: Vec<_> = page.iter().map(|r| r.short_id.as_str()).collect();
    assert_eq!(ids, vec!["id0002", "id0003"], "{name}");

    let all = storage.list(100, 0).await.unwrap();
    assert_eq!(all.len(), 5, "{name}");
    assert!(all.windows(2).all(|w| w[0].id < w[1].id), "{name}");
}

#[tokio::test]
async fn test_list_and_count() {
    for (name, storage) in backends().await {
        check_list_and_count(name, storage).await;
    }
}

#[tokio::test]
async fn test_sqlite_init_is_idempotent() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;
    storage
        .insert_if_absent("https://example.com", "keep01")
        .await
        .unwrap();

    storage.init().await.unwrap();

    assert!(storage.find_by_short_id("keep01").await.unwrap().is_some());
}
