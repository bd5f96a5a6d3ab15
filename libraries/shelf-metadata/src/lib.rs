//! Shelf Metadata
//!
//! Metadata extraction for Shelf documents.
//!
//! This crate provides:
//! - EPUB container parsing (`META-INF/container.xml` -> OPF package)
//! - Title and author from Dublin Core, including EPUB 3 refinements
//! - Cover image lookup (EPUB 2 `meta name="cover"` and EPUB 3 `cover-image`)
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_core::MetadataExtractor;
//! use shelf_metadata::EpubMetadataExtractor;
//! use std::path::Path;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = EpubMetadataExtractor::new().with_max_cover_bytes(2 * 1024 * 1024);
//! let metadata = extractor.extract(Path::new("/media/books/emma.epub"))?;
//! println!("{:?} by {}", metadata.title, metadata.author);
//! # Ok(())
//! # }
//! ```

mod error;
mod reader;

pub use error::{MetadataError, Result};
pub use reader::{EpubMetadataExtractor, DEFAULT_MAX_COVER_BYTES};
