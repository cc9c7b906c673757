/// Unified error types for UserDir
use thiserror::Error;

/// Main error type for directory resolution
#[derive(Error, Debug)]
pub enum UserDirError {
    /// Transport-level failure from the directory collaborator.
    /// Never cached; the next lookup retries the directory.
    #[error("Directory search failed: {0}")]
    Directory(String),

    /// Configuration validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for directory resolution operations
pub type UserDirResult<T> = Result<T, UserDirError>;
