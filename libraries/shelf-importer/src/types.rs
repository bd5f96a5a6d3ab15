//! Common types for the importer

use crate::ImportError;
use serde::{Deserialize, Serialize};
use shelf_core::{ErrorKind, ShelfError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for import operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Folder scanned when no root is given
    #[serde(default = "default_root")]
    pub default_root: PathBuf,

    /// Accepted file-name suffixes (e.g. ".epub")
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_true")]
    pub case_sensitive: bool,

    /// Copy imported documents into managed storage
    #[serde(default = "default_true")]
    pub copy_to_library: bool,

    /// Descend into symlinked directories
    #[serde(default)]
    pub follow_links: bool,

    /// Error kinds that halt the whole run instead of skipping one file
    #[serde(default = "default_fatal_errors")]
    pub fatal_errors: Vec<ErrorKind>,

    /// Covers above this size are not stored
    #[serde(default = "default_max_cover_bytes")]
    pub max_cover_bytes: u64,

    /// Treat an oversized cover as resource exhaustion rather than dropping it
    #[serde(default)]
    pub fail_on_oversized_cover: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec![".epub".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_fatal_errors() -> Vec<ErrorKind> {
    vec![ErrorKind::ResourceExhausted, ErrorKind::StoreUnavailable]
}

fn default_max_cover_bytes() -> u64 {
    8 * 1024 * 1024
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_root: default_root(),
            extensions: default_extensions(),
            case_sensitive: true,
            copy_to_library: true,
            follow_links: false,
            fatal_errors: default_fatal_errors(),
            max_cover_bytes: default_max_cover_bytes(),
            fail_on_oversized_cover: false,
        }
    }
}

impl ImportConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ImportError> {
        if self.extensions.is_empty() {
            return Err(ImportError::InvalidConfig(
                "at least one file extension is required".to_string(),
            ));
        }
        if self.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(ImportError::InvalidConfig(
                "file extensions must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Progress event emitted during a run
///
/// Events of one run arrive in processing order; `Finished` is always last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ImportProgress {
    /// The directory walk has started
    Scanning,

    /// Another directory was fully walked; `count` is cumulative
    FolderScanned { count: usize },

    /// `current` of `total` candidates have been processed
    Importing { current: usize, total: usize },

    Finished {
        imported: usize,
        had_error: bool,
        cancelled: bool,
    },
}

/// Lifecycle of one import run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportState {
    #[default]
    Idle,
    Scanning,
    Importing,
    Completed,
    Cancelled,
    /// Halted by a fatal error
    Aborted,
}

impl ImportState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Aborted)
    }
}

/// A file that could not be imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// Summary of an import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Folder the run scanned
    pub root: PathBuf,

    pub state: ImportState,

    /// Directories fully walked
    pub folders_scanned: usize,

    /// Candidate files found by the scan
    pub candidates: usize,

    /// Entries written to the catalog during this run
    pub imported: usize,

    /// Candidates skipped because their key was already catalogued
    pub already_present: usize,

    pub failed: usize,

    pub had_error: bool,

    pub cancelled: bool,

    /// Reason for a fatal halt
    pub aborted: Option<String>,

    pub errors: Vec<ImportFailure>,

    pub duration: Duration,
}

impl ImportOutcome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: ImportState::Idle,
            folders_scanned: 0,
            candidates: 0,
            imported: 0,
            already_present: 0,
            failed: 0,
            had_error: false,
            cancelled: false,
            aborted: None,
            errors: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Record a per-file failure
    pub fn record_failure(&mut self, path: &Path, err: &ShelfError) {
        self.failed += 1;
        self.had_error = true;
        self.errors.push(ImportFailure {
            path: path.to_path_buf(),
            kind: err.kind(),
            message: err.to_string(),
        });
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
        self.state = ImportState::Cancelled;
    }

    pub fn mark_aborted(&mut self, reason: impl Into<String>) {
        self.had_error = true;
        self.aborted = Some(reason.into());
        self.state = ImportState::Aborted;
    }

    /// Some file failed and the user did not cancel
    pub fn needs_error_notice(&self) -> bool {
        self.had_error && !self.cancelled
    }

    pub fn nothing_imported(&self) -> bool {
        self.imported == 0
    }

    /// The final progress event for this outcome
    pub fn finished_event(&self) -> ImportProgress {
        ImportProgress::Finished {
            imported: self.imported,
            had_error: self.had_error,
            cancelled: self.cancelled,
        }
    }

    pub fn summary_text(&self) -> String {
        let counts = format!(
            "{} imported, {} already in library, {} failed",
            self.imported, self.already_present, self.failed
        );
        match self.state {
            ImportState::Cancelled => format!("Import cancelled: {}", counts),
            ImportState::Aborted => format!(
                "Import stopped: {} ({})",
                counts,
                self.aborted.as_deref().unwrap_or("fatal error")
            ),
            _ => format!("Import complete: {}", counts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ImportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extensions, vec![".epub"]);
        assert!(config.fatal_errors.contains(&ErrorKind::StoreUnavailable));
    }

    #[test]
    fn empty_extensions_are_rejected() {
        let config = ImportConfig {
            extensions: Vec::new(),
            ..ImportConfig::default()
        };
        assert!(matches!(config.validate(), Err(ImportError::InvalidConfig(_))));

        let config = ImportConfig {
            extensions: vec![" ".to_string()],
            ..ImportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: ImportConfig =
            serde_json::from_str(r#"{"extensions": [".epub", ".kepub"]}"#).unwrap();

        assert_eq!(config.extensions.len(), 2);
        assert!(config.copy_to_library);
        assert_eq!(config.fatal_errors, default_fatal_errors());
    }

    #[test]
    fn error_notice_is_suppressed_by_cancel() {
        let mut outcome = ImportOutcome::new("/media/books");
        outcome.record_failure(
            Path::new("/media/books/bad.epub"),
            &ShelfError::metadata("truncated archive"),
        );
        assert!(outcome.needs_error_notice());
        assert!(outcome.nothing_imported());

        outcome.mark_cancelled();
        assert!(!outcome.needs_error_notice());
        assert!(outcome.summary_text().starts_with("Import cancelled"));
    }
}
