/// Core error types for Shelf
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using `ShelfError`
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Core error type for Shelf
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Catalog write or read failed for a single operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// The catalog store cannot serve any further requests
    #[error("Catalog store unavailable: {0}")]
    StoreUnavailable(String),

    /// Document metadata could not be parsed
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Memory or another unrecoverable resource ran out
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ShelfError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a store-unavailable error
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a resource exhaustion error
    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Classify this error
    ///
    /// I/O errors reporting `OutOfMemory` are treated as resource exhaustion.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(_) => ErrorKind::Storage,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::Metadata(_) => ErrorKind::Metadata,
            Self::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Io(e) if e.kind() == std::io::ErrorKind::OutOfMemory => {
                ErrorKind::ResourceExhausted
            }
            Self::Io(_) => ErrorKind::Io,
            Self::Database(_) => ErrorKind::Database,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

/// Coarse error category, used to decide whether a failure stops an import run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Storage,
    StoreUnavailable,
    Metadata,
    ResourceExhausted,
    NotFound,
    InvalidInput,
    Io,
    Database,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::StoreUnavailable => "store_unavailable",
            Self::Metadata => "metadata",
            Self::ResourceExhausted => "resource_exhausted",
            Self::NotFound => "not_found",
            Self::InvalidInput => "invalid_input",
            Self::Io => "io",
            Self::Database => "database",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_io_is_resource_exhaustion() {
        let err = ShelfError::from(std::io::Error::from(std::io::ErrorKind::OutOfMemory));
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);

        let err = ShelfError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn kind_names_match_serde() {
        let kinds = [
            ErrorKind::ResourceExhausted,
            ErrorKind::StoreUnavailable,
            ErrorKind::Metadata,
        ];
        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
