//! Read-only catalog views
//!
//! [`CatalogQuery`] is what the display layer reads from. It never writes and
//! works with any [`CatalogStore`], so it can be pointed at a fake in tests.

use shelf_core::{error::Result, types::Selection, CatalogStore, QueryResult};
use std::sync::Arc;

/// The five catalog orderings
#[derive(Clone)]
pub struct CatalogQuery {
    store: Arc<dyn CatalogStore>,
}

impl CatalogQuery {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Load the catalog in the given ordering
    ///
    /// # Errors
    /// Returns an error if the store cannot be read
    pub async fn load(&self, selection: Selection) -> Result<QueryResult> {
        tracing::debug!("Loading catalog ordered by {}", selection);
        self.store.query(selection).await
    }

    /// Most recently read first; never-read entries last
    pub async fn by_last_read(&self) -> Result<QueryResult> {
        self.load(Selection::ByLastRead).await
    }

    /// Most recently added first
    pub async fn by_last_added(&self) -> Result<QueryResult> {
        self.load(Selection::LastAdded).await
    }

    /// Unread entries only, most recently added first
    pub async fn unread(&self) -> Result<QueryResult> {
        self.load(Selection::Unread).await
    }

    pub async fn by_title(&self) -> Result<QueryResult> {
        self.load(Selection::ByTitle).await
    }

    /// Family name, then given name, then title
    pub async fn by_author(&self) -> Result<QueryResult> {
        self.load(Selection::ByAuthor).await
    }
}
