//! Paperview is the viewer core of the paperview reading room: it acquires
//! the external rendering engine on first demand, fetches one document under
//! the caller's credentials, and paints pages to a canvas surface with zoom,
//! pagination and fullscreen, discarding superseded render work.

pub mod cancel;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod viewer;

// Re-export core types
pub use cancel::CancelToken;
pub use engine::{CanvasSurface, DocumentHandle, PageHandle, PageSize, RenderEngine, Viewport};
pub use error::{EngineError, Result, ViewerError};
pub use fetch::{DocumentFetcher, FetchDocument};
pub use loader::{EngineLoader, SharedEngine};
pub use viewer::{
    FullscreenSurface, INITIAL_SCALE, MAX_SCALE, MIN_SCALE, Viewer, ViewerStatus, ZOOM_STEP,
};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
