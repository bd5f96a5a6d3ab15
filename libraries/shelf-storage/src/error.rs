/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Stored value could not be decoded
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error (managed storage)
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether the database itself is gone, rather than one statement failing
    pub fn is_systemic(&self) -> bool {
        match self {
            Self::Migration(_) => true,
            Self::Database(e) => matches!(
                e,
                sqlx::Error::PoolClosed
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::WorkerCrashed
            ),
            _ => false,
        }
    }
}

impl From<StorageError> for shelf_core::ShelfError {
    fn from(err: StorageError) -> Self {
        if err.is_systemic() {
            return shelf_core::ShelfError::store_unavailable(err.to_string());
        }
        match err {
            StorageError::NotFound { entity, id } => shelf_core::ShelfError::not_found(entity, id),
            StorageError::Io(e) => shelf_core::ShelfError::Io(e),
            StorageError::Database(e) => shelf_core::ShelfError::Database(e.to_string()),
            other => shelf_core::ShelfError::storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{ErrorKind, ShelfError};

    #[test]
    fn closed_pool_is_store_unavailable() {
        let err: ShelfError = StorageError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    #[test]
    fn row_errors_are_per_item() {
        let err: ShelfError = StorageError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.kind(), ErrorKind::Database);

        let err: ShelfError = StorageError::Corrupt("bad read_state".into()).into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
