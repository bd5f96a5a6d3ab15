/// `SQLite` implementation of the `CatalogStore` trait
use crate::{entries, ManagedStorage, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelf_core::{
    error::Result,
    types::{CatalogEntry, EntryKey, NewEntry, QueryResult, Selection},
    CatalogStore,
};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

/// Catalog backed by a local `SQLite` database and a managed-storage folder
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
    managed: ManagedStorage,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool, managed_root: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            managed: ManagedStorage::new(managed_root),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn managed(&self) -> &ManagedStorage {
        &self.managed
    }

    async fn copy_into_managed(&self, source: &Path) -> std::result::Result<PathBuf, StorageError> {
        let managed = self.managed.clone();
        let source = source.to_path_buf();

        let copied = tokio::task::spawn_blocking(move || managed.import(&source))
            .await
            .map_err(|e| std::io::Error::other(format!("copy task failed: {}", e)))??;

        Ok(copied)
    }

    async fn discard_copy(&self, path: PathBuf) {
        let managed = self.managed.clone();
        let target = path.clone();

        let removed = tokio::task::spawn_blocking(move || managed.remove(&target)).await;
        match removed {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
            Err(e) => tracing::warn!("Remove task for {} failed: {}", path.display(), e),
        }
    }

    fn missing(key: &EntryKey) -> StorageError {
        StorageError::not_found("Catalog entry", key.as_str())
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn exists(&self, key: &EntryKey) -> Result<bool> {
        Ok(entries::exists(&self.pool, key).await?)
    }

    async fn get(&self, key: &EntryKey) -> Result<Option<CatalogEntry>> {
        Ok(entries::get_by_key(&self.pool, key).await?)
    }

    async fn upsert(&self, entry: NewEntry, copy_file: bool) -> Result<CatalogEntry> {
        let previous = entries::get_by_key(&self.pool, &entry.key).await?;

        let file_path = if copy_file {
            self.copy_into_managed(&entry.source_path).await?
        } else {
            entry.source_path.clone()
        };
        let copied = file_path != entry.source_path;

        if let Err(e) = entries::upsert(&self.pool, &entry, &file_path).await {
            if copied {
                self.discard_copy(file_path).await;
            }
            return Err(e.into());
        }

        if let Some(previous) = previous {
            if previous.file_path != file_path {
                self.discard_copy(previous.file_path).await;
            }
        }

        tracing::debug!("Catalogued {} at {}", entry.key, file_path.display());

        entries::get_by_key(&self.pool, &entry.key)
            .await?
            .ok_or_else(|| Self::missing(&entry.key).into())
    }

    async fn delete(&self, key: &EntryKey) -> Result<()> {
        let entry = entries::get_by_key(&self.pool, key)
            .await?
            .ok_or_else(|| Self::missing(key))?;

        entries::delete(&self.pool, key).await?;
        self.discard_copy(entry.file_path).await;

        Ok(())
    }

    async fn mark_read(&self, key: &EntryKey, at: DateTime<Utc>) -> Result<()> {
        if !entries::mark_read(&self.pool, key, at).await? {
            return Err(Self::missing(key).into());
        }
        Ok(())
    }

    async fn mark_unread(&self, key: &EntryKey) -> Result<()> {
        if !entries::mark_unread(&self.pool, key).await? {
            return Err(Self::missing(key).into());
        }
        Ok(())
    }

    async fn query(&self, selection: Selection) -> Result<QueryResult> {
        let entries = entries::list(&self.pool, selection).await?;
        Ok(QueryResult::new(entries))
    }
}
