//! Error types for uploaded files

use thiserror::Error;

/// Upload error types
#[derive(Error, Debug)]
pub enum FileError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The temporary upload path does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// The client reported a zero-byte upload
    #[error("Empty upload: {name}")]
    EmptyUpload { name: String },
}

/// Result type for upload operations
pub type FileResult<T> = Result<T, FileError>;
