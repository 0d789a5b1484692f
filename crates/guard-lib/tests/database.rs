// crates/guard-lib/tests/database.rs
//! SQL store behavior against an in-memory SQLite database.

use authgate_common::IdentityRecord;
use guard_lib::storage::{DatabaseStore, IdentityStore, StorageError};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn memory_pool() -> SqlitePool {
    // a single connection keeps every query on the same in-memory database
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

fn record(username: &str, identity_key: &str, email: Option<&str>) -> IdentityRecord {
    IdentityRecord {
        id: 0,
        username: username.to_string(),
        identity_key: identity_key.to_string(),
        email: email.map(str::to_string),
        password_hash: "$scrypt$fake-hash".to_string(),
        banned: false,
    }
}

#[tokio::test]
async fn test_constructor_creates_schema() {
    let store = DatabaseStore::new(memory_pool().await).await.unwrap();
    assert!(store.add(&record("alice", "u1", None)).await.unwrap());
    assert!(store.find(None, Some("alice")).await.is_some());
}

#[tokio::test]
async fn test_constructor_rejects_incompatible_table() {
    let pool = memory_pool().await;
    sqlx::query("CREATE TABLE players (id integer PRIMARY KEY, email text NOT NULL)")
        .execute(&pool)
        .await
        .unwrap();

    assert!(DatabaseStore::new(pool).await.is_err());
}

#[tokio::test]
async fn test_add_duplicate() {
    let store = DatabaseStore::new(memory_pool().await).await.unwrap();
    assert!(store
        .add(&record("alice", "u1", Some("alice@example.com")))
        .await
        .unwrap());

    for colliding in [
        record("alice", "u2", None),                      // username taken
        record("bob", "u1", None),                        // identity key taken
        record("bob", "u2", Some("alice@example.com")),   // email taken
    ] {
        let err = store.add(&colliding).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists));
    }
}

#[tokio::test]
async fn test_absent_email_is_not_unique() {
    let store = DatabaseStore::new(memory_pool().await).await.unwrap();
    assert!(store.add(&record("alice", "u1", None)).await.unwrap());
    assert!(store.add(&record("bob", "u2", Some(""))).await.unwrap());
    assert!(store.add(&record("carol", "u3", None)).await.unwrap());
}

#[tokio::test]
async fn test_add_when_backend_down() {
    let pool = memory_pool().await;
    let store = DatabaseStore::new(pool.clone()).await.unwrap();
    pool.close().await;

    let added = store.add(&record("alice", "u1", None)).await.unwrap();
    assert!(!added, "a dead pool reads as not-registered, not an error");
}

#[tokio::test]
async fn test_find_variants() {
    let store = DatabaseStore::new(memory_pool().await).await.unwrap();
    store
        .add(&record("alice", "u1", Some("alice@example.com")))
        .await
        .unwrap();

    assert!(store.find(Some("alice@example.com"), None).await.is_some());
    assert!(store.find(None, Some("alice")).await.is_some());
    assert!(store
        .find(Some("alice@example.com"), Some("alice"))
        .await
        .is_some());
    // either side may match
    assert!(store
        .find(Some("nobody@example.com"), Some("alice"))
        .await
        .is_some());
    assert!(store
        .find(Some("nobody@example.com"), Some("bob"))
        .await
        .is_none());
    // an unscoped lookup is never permitted
    assert!(store.find(None, None).await.is_none());
}

#[tokio::test]
async fn test_find_when_backend_down() {
    let pool = memory_pool().await;
    let store = DatabaseStore::new(pool.clone()).await.unwrap();
    store.add(&record("alice", "u1", None)).await.unwrap();
    pool.close().await;

    assert!(store.find(None, Some("alice")).await.is_none());
}

#[tokio::test]
async fn test_banned_flag_round_trips() {
    let store = DatabaseStore::new(memory_pool().await).await.unwrap();
    let mut rec = record("alice", "u1", None);
    rec.banned = true;
    store.add(&rec).await.unwrap();

    let found = store.find(None, Some("alice")).await.unwrap();
    assert!(found.banned);
    assert_eq!(found.password_hash, "$scrypt$fake-hash");
}
