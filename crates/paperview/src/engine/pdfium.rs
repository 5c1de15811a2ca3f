//! Pdfium-backed rendering engine
//!
//! Binds the pdfium dynamic library from known search paths with a system
//! library fallback. Loading happens at most once per process through the
//! [`EngineLoader`](crate::loader::EngineLoader); the bound library is
//! intentionally leaked so decoded documents can borrow it for `'static`.

use async_trait::async_trait;
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;

use crate::engine::{DocumentHandle, PageHandle, PageSize, RenderEngine, Viewport};
use crate::error::EngineError;

pub struct PdfiumEngine {
    pdfium: &'static Pdfium,
}

impl PdfiumEngine {
    /// Bind the pdfium library.
    ///
    /// Search order: `lib/` under the working directory (development), then
    /// `lib/` next to the executable, then the system library.
    pub fn load() -> Result<Self, EngineError> {
        for dir in Self::search_paths() {
            let library = Pdfium::pdfium_platform_library_name_at_path(&dir);
            if library.exists() {
                if let Ok(bindings) = Pdfium::bind_to_library(&library) {
                    return Ok(Self::from_bindings(bindings));
                }
            }
        }

        Pdfium::bind_to_system_library()
            .map(Self::from_bindings)
            .map_err(|e| EngineError::Unavailable(format!("failed to bind pdfium: {e:?}")))
    }

    fn from_bindings(bindings: Box<dyn PdfiumLibraryBindings>) -> Self {
        // One bind per process, never unloaded: leaking gives documents a
        // 'static borrow of the library.
        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        Self { pdfium }
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join("lib"));
        }

        if let Ok(exe) = std::env::current_exe() {
            if let Some(parent) = exe.parent() {
                paths.push(parent.join("lib"));
            }
        }

        paths
    }
}

impl RenderEngine for PdfiumEngine {
    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn DocumentHandle>, EngineError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(bytes.to_vec(), None)
            .map_err(|e| EngineError::Malformed(format!("{e:?}")))?;

        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument {
    document: PdfDocument<'static>,
}

impl DocumentHandle for PdfiumDocument {
    fn page_count(&self) -> u32 {
        u32::from(self.document.pages().len())
    }

    fn page(&self, number: u32) -> Result<Box<dyn PageHandle + '_>, EngineError> {
        let index = number
            .checked_sub(1)
            .ok_or(EngineError::PageOutOfRange(number))?;
        let index = u16::try_from(index).map_err(|_| EngineError::PageOutOfRange(number))?;

        let page = self
            .document
            .pages()
            .get(index)
            .map_err(|_| EngineError::PageOutOfRange(number))?;

        Ok(Box::new(PdfiumPage { page }))
    }
}

struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

#[async_trait(?Send)]
impl PageHandle for PdfiumPage<'_> {
    fn base_size(&self) -> PageSize {
        PageSize {
            width_pt: self.page.width().value,
            height_pt: self.page.height().value,
        }
    }

    async fn render(&self, viewport: &Viewport) -> Result<RgbaImage, EngineError> {
        let config = PdfRenderConfig::new()
            .set_target_width(viewport.width_px as i32)
            .set_maximum_height(viewport.height_px as i32);

        let bitmap = self
            .page
            .render_with_config(&config)
            .map_err(|e| EngineError::Render(format!("{e:?}")))?;

        Ok(bitmap.as_image().into_rgba8())
    }
}
