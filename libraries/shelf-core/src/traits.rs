/// Collaborator traits for Shelf
use crate::error::Result;
use crate::types::{BookMetadata, CatalogEntry, EntryKey, NewEntry, QueryResult, Selection};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Metadata extractor trait
///
/// Implementers parse container metadata (title, author, cover) from a document file.
/// Extraction is blocking; callers on an async runtime should run it on a blocking thread.
pub trait MetadataExtractor: Send + Sync {
    /// Read metadata from a document file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed. Errors whose
    /// [`kind`](crate::ShelfError::kind) is `ResourceExhausted` signal that the
    /// caller should stop rather than try the next file.
    fn extract(&self, path: &Path) -> Result<BookMetadata>;
}

/// Persistent catalog of imported documents
///
/// Implementations serialize their own writes. Each call is atomic on its own;
/// no atomicity is promised across calls.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check whether an entry with this key is already catalogued
    async fn exists(&self, key: &EntryKey) -> Result<bool>;

    /// Get a single entry
    async fn get(&self, key: &EntryKey) -> Result<Option<CatalogEntry>>;

    /// Insert or replace the entry for `entry.key`
    ///
    /// When `copy_file` is set the source file is copied into managed storage
    /// and the stored entry points at the copy.
    async fn upsert(&self, entry: NewEntry, copy_file: bool) -> Result<CatalogEntry>;

    /// Remove an entry (and its managed copy, if any)
    async fn delete(&self, key: &EntryKey) -> Result<()>;

    /// Record that an entry was read at `at`
    async fn mark_read(&self, key: &EntryKey, at: DateTime<Utc>) -> Result<()>;

    /// Reset an entry to unread
    async fn mark_unread(&self, key: &EntryKey) -> Result<()>;

    /// Fetch the catalog in the given ordering
    async fn query(&self, selection: Selection) -> Result<QueryResult>;
}
