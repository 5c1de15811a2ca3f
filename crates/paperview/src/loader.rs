//! Lazy, shared acquisition of the rendering engine
//!
//! The engine is loaded at most once per browsing context. Concurrent first
//! callers await the same in-flight initialization instead of triggering a
//! second load; later callers get the cached handle. A failed load is
//! reported to each caller and retried only when something calls
//! `ensure_loaded` again (in practice: a user-initiated remount).

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tokio::sync::OnceCell;

use crate::engine::RenderEngine;
use crate::error::{EngineError, ViewerError};

/// The engine handle shared by every viewer in a browsing context.
/// Read-only after initialization.
pub type SharedEngine = Rc<dyn RenderEngine>;

type EngineFuture = Pin<Box<dyn Future<Output = Result<SharedEngine, EngineError>>>>;

pub struct EngineLoader {
    cell: OnceCell<SharedEngine>,
    factory: Box<dyn Fn() -> EngineFuture>,
}

impl EngineLoader {
    /// Build a loader around an engine factory. The factory runs at most
    /// once for the lifetime of the loader (barring failures).
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<SharedEngine, EngineError>> + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(move || Box::pin(factory())),
        }
    }

    /// Loader backed by the pdfium dynamic library.
    #[cfg(feature = "pdfium")]
    pub fn pdfium() -> Self {
        use crate::engine::pdfium::PdfiumEngine;

        Self::new(|| async {
            let engine = PdfiumEngine::load()?;
            Ok(Rc::new(engine) as SharedEngine)
        })
    }

    /// Get the engine, loading it on first demand.
    pub async fn ensure_loaded(&self) -> Result<SharedEngine, ViewerError> {
        self.cell
            .get_or_try_init(|| (self.factory)())
            .await
            .cloned()
            .map_err(|e| ViewerError::LibraryLoad(e.to_string()))
    }
}
