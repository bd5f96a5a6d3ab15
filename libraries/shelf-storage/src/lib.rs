//! Shelf Storage
//!
//! `SQLite` catalog for Shelf.
//!
//! This crate provides the persistent [`CatalogStore`](shelf_core::CatalogStore)
//! used by the import pipeline, the managed-storage folder that imported
//! documents are copied into, and the [`CatalogQuery`] facade the display
//! layer reads from.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `entries` owns its own queries
//! - **Managed Storage**: copies live under one root that scanners must skip
//! - **Locale Collation**: title and author orderings use the `shelf_locale` collation
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_storage::{create_pool, run_migrations, CatalogQuery, SqliteCatalog};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://shelf.db").await?;
//! run_migrations(&pool).await?;
//!
//! let catalog = Arc::new(SqliteCatalog::new(pool, "/home/me/.shelf/books"));
//! let query = CatalogQuery::new(catalog);
//! let newest = query.by_last_added().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

pub mod collation;
pub mod entries;
pub mod managed;
pub mod query;

pub use context::SqliteCatalog;
pub use error::StorageError;
pub use managed::ManagedStorage;
pub use query::CatalogQuery;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// Every connection registers the `shelf_locale` collation used by the
/// title and author orderings.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://shelf.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating catalog pool for {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30))
        .collation(collation::NAME, collation::compare);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create a pool and bring the schema up to date
///
/// # Errors
///
/// Returns an error if the connection or a migration fails
pub async fn open(database_url: &str) -> Result<SqlitePool, StorageError> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    Ok(pool)
}
