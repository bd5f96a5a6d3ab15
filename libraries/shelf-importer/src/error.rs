//! Error types for the importer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import already in progress")]
    AlreadyRunning,

    #[error("Invalid import configuration: {0}")]
    InvalidConfig(String),

    #[error("Import task failed: {0}")]
    Join(String),

    #[error(transparent)]
    Core(#[from] shelf_core::ShelfError),
}

impl From<tokio::task::JoinError> for ImportError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}
