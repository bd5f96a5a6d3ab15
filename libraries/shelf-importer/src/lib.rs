//! Shelf Importer
//!
//! This crate imports e-book files into the Shelf catalog.
//!
//! # Features
//!
//! - Recursive, deterministic folder scanning with a managed-storage exclusion
//! - Metadata extraction on blocking worker threads
//! - Idempotent imports keyed by file name
//! - Cooperative cancellation and per-file error isolation
//! - Progress reporting through [`ProgressSink`]
//! - Serialized background runs via [`ImportManager`]
//!
//! # Architecture
//!
//! - `scanner`: Filesystem walk producing candidates
//! - `policy`: Skip-or-halt classification of failures
//! - `progress`: Progress sinks
//! - `pipeline`: Orchestration of one run
//! - `manager`: Background runs, one at a time
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_importer::{ImportPipeline, NoProgress};
//! use shelf_metadata::EpubMetadataExtractor;
//! use shelf_storage::SqliteCatalog;
//! use std::path::Path;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(pool: sqlx::SqlitePool) {
//! let catalog = Arc::new(SqliteCatalog::new(pool, "/home/me/.shelf/books"));
//! let pipeline = ImportPipeline::new(
//!     catalog,
//!     Arc::new(EpubMetadataExtractor::new()),
//!     "/home/me/.shelf/books",
//! );
//!
//! let outcome = pipeline
//!     .run(Path::new("/media/books"), &CancellationToken::new(), Arc::new(NoProgress))
//!     .await;
//! println!("{}", outcome.summary_text());
//! # }
//! ```

mod error;
mod types;

pub mod manager;
pub mod pipeline;
pub mod policy;
pub mod progress;
pub mod scanner;

pub use error::ImportError;
pub use manager::{ImportHandle, ImportManager};
pub use pipeline::{CandidateResult, ImportPipeline};
pub use policy::{FailurePolicy, Severity};
pub use progress::{ChannelProgress, NoProgress, ProgressSink};
pub use scanner::{Candidate, Candidates, FileFilter, FileScanner, ScanRoot};
pub use types::*;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
