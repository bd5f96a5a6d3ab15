//! Shelf Core
//!
//! Domain types, collaborator traits, and error handling shared by every Shelf crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `CatalogEntry`, `EntryKey`, `Author`, `NewEntry`, `Selection`
//! - **Collaborator Traits**: `CatalogStore`, `MetadataExtractor`
//! - **Error Handling**: Unified `ShelfError`, `ErrorKind` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use shelf_core::types::{Author, EntryKey, NewEntry};
//! use std::path::Path;
//!
//! let path = Path::new("/media/books/emma.epub");
//! let key = EntryKey::from_path(path).unwrap();
//! let entry = NewEntry::new(key, "Emma", path).with_author(Author::new("Jane", "Austen"));
//!
//! assert_eq!(entry.key.as_str(), "emma.epub");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, Result, ShelfError};
pub use traits::{CatalogStore, MetadataExtractor};

pub use types::{
    Author, BookMetadata, CatalogEntry, EntryKey, NewEntry, QueryResult, ReadState, Selection,
};
