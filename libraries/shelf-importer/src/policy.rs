//! Decides whether a failure skips one file or stops the run

use shelf_core::{ErrorKind, ShelfError};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Record the failure and continue with the next candidate
    Skip,
    /// Record the failure and halt the run
    Fatal,
}

/// Classifies errors by kind against a configurable fatal set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailurePolicy {
    fatal: HashSet<ErrorKind>,
}

impl FailurePolicy {
    pub fn new(fatal: impl IntoIterator<Item = ErrorKind>) -> Self {
        Self {
            fatal: fatal.into_iter().collect(),
        }
    }

    pub fn classify(&self, err: &ShelfError) -> Severity {
        if self.is_fatal(err.kind()) {
            Severity::Fatal
        } else {
            Severity::Skip
        }
    }

    pub fn is_fatal(&self, kind: ErrorKind) -> bool {
        self.fatal.contains(&kind)
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::new([ErrorKind::ResourceExhausted, ErrorKind::StoreUnavailable])
    }
}
