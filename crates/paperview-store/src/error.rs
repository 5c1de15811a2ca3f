//! Error types for document storage backends

use thiserror::Error;

/// Storage-specific errors
///
/// `InvalidKey` and `NotFound` are deliberately kept separate so callers can
/// log the real cause, but the HTTP edge collapses both into one "document
/// not found" response so a rejected key reveals nothing about why.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid document key: {0}")]
    InvalidKey(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;
