//! Error types for the viewer core

use thiserror::Error;

/// Failures reported by a rendering engine implementation
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine library unavailable: {0}")]
    Unavailable(String),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("page {0} out of range")]
    PageOutOfRange(u32),

    #[error("render failed: {0}")]
    Render(String),
}

/// Failures surfaced to the viewer's error state.
///
/// None of these are retried automatically; the user remounts the viewer to
/// try again. The message is what the user sees next to the dead canvas, so
/// every variant renders human-readable.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("rendering library failed to load: {0}")]
    LibraryLoad(String),

    #[error("document fetch failed: {0}")]
    Fetch(String),

    #[error("document could not be decoded: {0}")]
    Decode(String),

    #[error("page render failed: {0}")]
    Render(#[from] EngineError),
}

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;
