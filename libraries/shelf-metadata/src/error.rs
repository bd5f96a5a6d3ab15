/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The container is missing a required part
    #[error("Invalid EPUB: {0}")]
    InvalidContainer(String),

    /// Cover image is larger than the configured limit
    #[error("Cover image is {size} bytes (limit {limit})")]
    CoverTooLarge { size: u64, limit: u64 },

    /// Malformed XML in the container or package document
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// Archive error
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<MetadataError> for shelf_core::ShelfError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::Io(e) if e.kind() == std::io::ErrorKind::OutOfMemory => {
                shelf_core::ShelfError::resource_exhausted(e.to_string())
            }
            MetadataError::Zip(zip::result::ZipError::Io(e))
                if e.kind() == std::io::ErrorKind::OutOfMemory =>
            {
                shelf_core::ShelfError::resource_exhausted(e.to_string())
            }
            err @ MetadataError::CoverTooLarge { .. } => {
                shelf_core::ShelfError::resource_exhausted(err.to_string())
            }
            other => shelf_core::ShelfError::metadata(other.to_string()),
        }
    }
}
