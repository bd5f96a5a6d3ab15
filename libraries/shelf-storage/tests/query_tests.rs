//! Integration tests for the five catalog orderings


use shelf_core::types::*;
use shelf_core::CatalogStore;
use shelf_storage::CatalogQuery;
use std::sync::Arc;
use test_helpers::*;

async fn seeded() -> (TestDb, CatalogQuery) {
    let test_db = TestDb::new().await;
    let catalog = test_db.catalog();

    let books = [
        ("persuasion.epub", "Persuasion", Author::new("Jane", "Austen"), 0),
        ("germinal.epub", "Germinal", Author::new("Émile", "Zola"), 1),
        ("dracula.epub", "Dracula", Author::new("Bram", "Stoker"), 2),
        ("emma.epub", "emma", Author::new("Jane", "Austen"), 3),
        ("ecume.epub", "Écume des jours", Author::new("Boris", "Vian"), 4),
    ];
    for (file, title, author, added) in books {
        catalog
            .upsert(new_entry(file, title, author, added), false)
            .await
            .unwrap();
    }

    catalog
        .mark_read(&EntryKey::new("dracula.epub"), at(100))
        .await
        .unwrap();
    catalog
        .mark_read(&EntryKey::new("persuasion.epub"), at(200))
        .await
        .unwrap();

    let query = CatalogQuery::new(Arc::new(catalog));
    (test_db, query)
}

#[tokio::test]
async fn test_by_last_read_puts_never_read_last() {
    let (_db, query) = seeded().await;

    let result = query.by_last_read().await.unwrap();

    assert_eq!(
        keys(&result),
        vec![
            "persuasion.epub",
            "dracula.epub",
            "ecume.epub",
            "emma.epub",
            "germinal.epub",
        ]
    );
    assert_eq!(result.total, 5);
}

#[tokio::test]
async fn test_by_last_added_is_newest_first() {
    let (_db, query) = seeded().await;

    let result = query.by_last_added().await.unwrap();

    assert_eq!(
        keys(&result),
        vec![
            "ecume.epub",
            "emma.epub",
            "dracula.epub",
            "germinal.epub",
            "persuasion.epub",
        ]
    );
}

#[tokio::test]
async fn test_unread_excludes_read_entries() {
    let (_db, query) = seeded().await;

    let result = query.unread().await.unwrap();

    assert_eq!(
        keys(&result),
        vec!["ecume.epub", "emma.epub", "germinal.epub"]
    );
    assert_eq!(result.total, 3);
    assert!(result.iter().all(CatalogEntry::is_unread));
}

#[tokio::test]
async fn test_by_title_ignores_case_and_accents() {
    let (_db, query) = seeded().await;

    let result = query.by_title().await.unwrap();
    let titles: Vec<&str> = result.iter().map(|e| e.title.as_str()).collect();

    assert_eq!(
        titles,
        vec!["Dracula", "Écume des jours", "emma", "Germinal", "Persuasion"]
    );
}

#[tokio::test]
async fn test_by_author_then_title() {
    let (_db, query) = seeded().await;

    let result = query.by_author().await.unwrap();

    assert_eq!(
        keys(&result),
        vec![
            "emma.epub",
            "persuasion.epub",
            "dracula.epub",
            "ecume.epub",
            "germinal.epub",
        ]
    );
}

#[tokio::test]
async fn test_load_matches_named_orderings() {
    let (_db, query) = seeded().await;

    for selection in Selection::ALL {
        let loaded = query.load(selection).await.unwrap();
        let named = match selection {
            Selection::ByLastRead => query.by_last_read().await,
            Selection::LastAdded => query.by_last_added().await,
            Selection::Unread => query.unread().await,
            Selection::ByTitle => query.by_title().await,
            Selection::ByAuthor => query.by_author().await,
        }
        .unwrap();
        assert_eq!(loaded, named, "ordering {}", selection);
    }
}

#[tokio::test]
async fn test_empty_catalog() {
    let test_db = TestDb::new().await;
    let query = CatalogQuery::new(Arc::new(test_db.catalog()));

    for selection in Selection::ALL {
        let result = query.load(selection).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total, 0);
    }
}
