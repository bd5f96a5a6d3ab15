//! Integration tests for the SQLite catalog
//!
//! Tests:
//! - Insert, lookup and refresh by key
//! - Managed-storage copies and their cleanup
//! - Read-state maintenance
//! - Error mapping for unknown keys


use shelf_core::types::*;
use shelf_core::{CatalogStore, ErrorKind};
use test_helpers::*;

#[tokio::test]
async fn test_upsert_and_get() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();

    let entry = new_entry("emma.epub", "Emma", Author::new("Jane", "Austen"), 0);
    let stored = catalog.upsert(entry, false).await.unwrap();

    assert_eq!(stored.key.as_str(), "emma.epub");
    assert_eq!(stored.title, "Emma");
    assert_eq!(stored.author.last_name, "Austen");
    assert_eq!(stored.added_at, at(0));
    assert_eq!(stored.read_state, ReadState::Unread);
    assert!(stored.last_read.is_none());

    let key = EntryKey::new("emma.epub");
    assert!(catalog.exists(&key).await.unwrap());
    assert_eq!(catalog.get(&key).await.unwrap(), Some(stored));
    assert!(!catalog.exists(&EntryKey::new("other.epub")).await.unwrap());
}

#[tokio::test]
async fn test_upsert_keeps_history_of_existing_entry() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();
    let key = EntryKey::new("emma.epub");

    catalog
        .upsert(new_entry("emma.epub", "Emma", Author::default(), 0), false)
        .await
        .unwrap();
    catalog.mark_read(&key, at(30)).await.unwrap();

    let refreshed = catalog
        .upsert(
            new_entry("emma.epub", "Emma (Annotated)", Author::new("Jane", "Austen"), 60),
            false,
        )
        .await
        .unwrap();

    assert_eq!(refreshed.title, "Emma (Annotated)");
    assert_eq!(refreshed.author.first_name, "Jane");
    assert_eq!(refreshed.added_at, at(0));
    assert_eq!(refreshed.last_read, Some(at(30)));
    assert_eq!(refreshed.read_state, ReadState::Read);

    let count = shelf_storage::entries::count(test_db.pool()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_cover_bytes_round_trip() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();

    let entry = new_entry("cover.epub", "Cover", Author::default(), 0)
        .with_cover(Some(vec![0x89, b'P', b'N', b'G']));
    let stored = catalog.upsert(entry, false).await.unwrap();

    assert_eq!(stored.cover.as_deref(), Some(&[0x89, b'P', b'N', b'G'][..]));
}

#[tokio::test]
async fn test_copy_into_managed_storage() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();

    let source = test_db.source_file("emma.epub");
    let entry = NewEntry::new(EntryKey::new("emma.epub"), "Emma", &source);

    let stored = catalog.upsert(entry, true).await.unwrap();

    assert!(stored.file_path.starts_with(test_db.managed_root()));
    assert_ne!(stored.file_path, source);
    assert!(stored.file_path.exists());
    assert!(source.exists(), "the source must never be moved");
}

#[tokio::test]
async fn test_without_copy_records_source_path() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();

    let source = test_db.source_file("emma.epub");
    let entry = NewEntry::new(EntryKey::new("emma.epub"), "Emma", &source);

    let stored = catalog.upsert(entry, false).await.unwrap();

    assert_eq!(stored.file_path, source);
    assert!(!test_db.managed_root().exists());
}

#[tokio::test]
async fn test_delete_removes_managed_copy_only() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();

    let copied_source = test_db.source_file("copied.epub");
    let linked_source = test_db.source_file("linked.epub");

    let copied = catalog
        .upsert(NewEntry::new(EntryKey::new("copied.epub"), "Copied", &copied_source), true)
        .await
        .unwrap();
    catalog
        .upsert(NewEntry::new(EntryKey::new("linked.epub"), "Linked", &linked_source), false)
        .await
        .unwrap();

    catalog.delete(&EntryKey::new("copied.epub")).await.unwrap();
    catalog.delete(&EntryKey::new("linked.epub")).await.unwrap();

    assert!(!copied.file_path.exists());
    assert!(copied_source.exists());
    assert!(linked_source.exists());
    assert_eq!(shelf_storage::entries::count(test_db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_keys_are_not_found() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();
    let key = EntryKey::new("missing.epub");

    let err = catalog.delete(&key).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = catalog.mark_read(&key, at(0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = catalog.mark_unread(&key).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert!(catalog.get(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_mark_unread_keeps_last_read() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();
    let key = EntryKey::new("emma.epub");

    catalog
        .upsert(new_entry("emma.epub", "Emma", Author::default(), 0), false)
        .await
        .unwrap();
    catalog.mark_read(&key, at(10)).await.unwrap();
    catalog.mark_unread(&key).await.unwrap();

    let entry = catalog.get(&key).await.unwrap().unwrap();
    assert!(entry.is_unread());
    assert_eq!(entry.last_read, Some(at(10)));
}

#[tokio::test]
async fn test_closed_pool_is_store_unavailable() {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();

    test_db.pool().close().await;

    let err = catalog.exists(&EntryKey::new("emma.epub")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
}
