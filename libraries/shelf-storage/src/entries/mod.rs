//! Catalog entry storage
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_core::types::{EntryKey, NewEntry, Selection};
//! use shelf_storage::entries;
//!
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! let key = EntryKey::new("emma.epub");
//! let entry = NewEntry::new(key.clone(), "Emma", "/media/books/emma.epub");
//!
//! entries::upsert(pool, &entry, &entry.source_path).await?;
//! assert!(entries::exists(pool, &key).await?);
//!
//! let newest = entries::list(pool, Selection::LastAdded).await?;
//! # Ok(())
//! # }
//! ```

use crate::StorageError;
use chrono::{DateTime, Utc};
use shelf_core::types::{Author, CatalogEntry, EntryKey, NewEntry, ReadState, Selection};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, StorageError>;

const SELECT_ENTRY: &str = r#"
    SELECT entry_key, title, author_first, author_last, file_path,
           added_at, last_read, read_state, cover
    FROM catalog_entries
"#;

#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    entry_key: String,
    title: String,
    author_first: String,
    author_last: String,
    file_path: String,
    added_at: i64,
    last_read: Option<i64>,
    read_state: String,
    cover: Option<Vec<u8>>,
}

impl TryFrom<EntryRow> for CatalogEntry {
    type Error = StorageError;

    fn try_from(row: EntryRow) -> Result<Self> {
        let read_state = ReadState::parse(&row.read_state).ok_or_else(|| {
            StorageError::Corrupt(format!(
                "entry {} has read_state '{}'",
                row.entry_key, row.read_state
            ))
        })?;

        Ok(CatalogEntry {
            key: EntryKey::new(row.entry_key),
            title: row.title,
            author: Author::new(row.author_first, row.author_last),
            file_path: PathBuf::from(row.file_path),
            added_at: from_millis(row.added_at),
            last_read: row.last_read.map(from_millis),
            read_state,
            cover: row.cover,
        })
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Check whether an entry with this key exists
pub async fn exists(pool: &SqlitePool, key: &EntryKey) -> Result<bool> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM catalog_entries WHERE entry_key = ?)",
    )
    .bind(key.as_str())
    .fetch_one(pool)
    .await?;

    Ok(found)
}

/// Get an entry by key
pub async fn get_by_key(pool: &SqlitePool, key: &EntryKey) -> Result<Option<CatalogEntry>> {
    let query = format!("{} WHERE entry_key = ?", SELECT_ENTRY);

    let row: Option<EntryRow> = sqlx::query_as(&query)
        .bind(key.as_str())
        .fetch_optional(pool)
        .await?;

    row.map(CatalogEntry::try_from).transpose()
}

/// Insert an entry, or refresh the metadata of an existing one
///
/// An existing entry keeps its `added_at`, `last_read` and read state.
/// `file_path` is where the document now lives (managed copy or source).
pub async fn upsert(pool: &SqlitePool, entry: &NewEntry, file_path: &Path) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO catalog_entries
            (entry_key, title, author_first, author_last, file_path, added_at, read_state, cover)
        VALUES (?, ?, ?, ?, ?, ?, 'unread', ?)
        ON CONFLICT(entry_key) DO UPDATE SET
            title = excluded.title,
            author_first = excluded.author_first,
            author_last = excluded.author_last,
            file_path = excluded.file_path,
            cover = excluded.cover
        "#,
    )
    .bind(entry.key.as_str())
    .bind(&entry.title)
    .bind(&entry.author.first_name)
    .bind(&entry.author.last_name)
    .bind(file_path.to_string_lossy().as_ref())
    .bind(entry.added_at.timestamp_millis())
    .bind(entry.cover.as_deref())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an entry; returns whether a row was removed
pub async fn delete(pool: &SqlitePool, key: &EntryKey) -> Result<bool> {
    let result = sqlx::query("DELETE FROM catalog_entries WHERE entry_key = ?")
        .bind(key.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Record a read; returns whether the entry exists
pub async fn mark_read(pool: &SqlitePool, key: &EntryKey, at: DateTime<Utc>) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE catalog_entries SET last_read = ?, read_state = 'read' WHERE entry_key = ?",
    )
    .bind(at.timestamp_millis())
    .bind(key.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Reset an entry to unread, keeping its last-read time
pub async fn mark_unread(pool: &SqlitePool, key: &EntryKey) -> Result<bool> {
    let result = sqlx::query("UPDATE catalog_entries SET read_state = 'unread' WHERE entry_key = ?")
        .bind(key.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count all entries
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_entries")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List entries in the given ordering
pub async fn list(pool: &SqlitePool, selection: Selection) -> Result<Vec<CatalogEntry>> {
    let query = format!("{} {}", SELECT_ENTRY, order_clause(selection));

    let rows: Vec<EntryRow> = sqlx::query_as(&query).fetch_all(pool).await?;

    rows.into_iter().map(CatalogEntry::try_from).collect()
}

fn order_clause(selection: Selection) -> &'static str {
    match selection {
        Selection::ByLastRead => "ORDER BY last_read IS NULL, last_read DESC, added_at DESC, id DESC",
        Selection::LastAdded => "ORDER BY added_at DESC, id DESC",
        Selection::Unread => "WHERE read_state = 'unread' ORDER BY added_at DESC, id DESC",
        Selection::ByTitle => "ORDER BY title COLLATE shelf_locale, id",
        Selection::ByAuthor => {
            "ORDER BY author_last COLLATE shelf_locale, author_first COLLATE shelf_locale, \
             title COLLATE shelf_locale, id"
        }
    }
}
