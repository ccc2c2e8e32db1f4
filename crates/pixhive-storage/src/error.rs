//! Storage operation errors.

use pixhive_processing::FilterError;

/// Errors surfaced by the storage adapter and its backends.
///
/// Sink and deletion failures carry the affected filename because they are
/// reported per rendition and never aggregated into one failure that cancels
/// siblings.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload rejected: {0}")]
    Rejected(#[from] FilterError),

    #[error("Image decode failed: {0}")]
    Decode(String),

    #[error("Image encode failed for {filename}: {message}")]
    Encode { filename: String, message: String },

    #[error("Write failed for {filename}: {source}")]
    Sink {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Delete failed for {filename}: {source}")]
    Deletion {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
