//! Shelf command-line front end
//!
//! Configuration loading and terminal progress rendering; the binary in
//! `main.rs` wires these to the importer and the SQLite catalog.

pub mod config;
pub mod error;
pub mod progress;
pub mod report;

pub use config::{LibrarySettings, ShelfConfig};
pub use error::{CliError, Result};
pub use progress::ProgressRenderer;
pub use report::outcome_messages;
