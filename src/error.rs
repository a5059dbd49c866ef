//! Error types for go-move.
//!
//! All operations return `Result<T>` which aliases `Result<T, MoveError>`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from move operations.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Source file does not exist or is not a regular file.
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    /// Destination file already exists.
    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// Path does not name a Go source file.
    #[error("Not a Go source file: {0}")]
    NotGoSource(PathBuf),

    /// Invalid path.
    #[error("Invalid path '{0}': {1}")]
    InvalidPath(String, String),

    /// External formatter could not be run or reported failure.
    #[error("Formatter failed on {path}: {message}")]
    Formatter { path: PathBuf, message: String },

    /// User declined confirmation.
    ///
    /// Not a failure; used for control flow when the user cancels.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Regex compilation failed (indicates bug).
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for go-move operations.
pub type Result<T> = std::result::Result<T, MoveError>;
