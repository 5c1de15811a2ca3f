//! Rendering engine capability contracts
//!
//! The viewer depends only on these traits: a decoded document exposes a
//! page count and per-page access, a page renders into an RGBA bitmap for a
//! chosen viewport, and a canvas surface accepts the result. The concrete
//! engine (pdfium behind the `pdfium` feature) is an externally-owned
//! resource obtained through the [`EngineLoader`](crate::loader::EngineLoader).

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::EngineError;

#[cfg(feature = "pdfium")]
pub mod pdfium;

/// Page dimensions in PDF points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

/// Pixel dimensions of one render, derived from a page size and a scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
    pub scale: f32,
}

impl Viewport {
    /// Compute the viewport for a page at the given scale, rounding to whole
    /// pixels. A degenerate page still yields at least one pixel each way so
    /// the canvas never collapses to zero.
    pub fn for_page(size: PageSize, scale: f32) -> Self {
        Self {
            width_px: ((size.width_pt * scale).round() as u32).max(1),
            height_px: ((size.height_pt * scale).round() as u32).max(1),
            scale,
        }
    }
}

/// A rendering engine capable of decoding PDF bytes
pub trait RenderEngine {
    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn DocumentHandle>, EngineError>;
}

/// A decoded, page-addressable document
pub trait DocumentHandle {
    fn page_count(&self) -> u32;

    /// Fetch one page. `number` is 1-indexed, matching what the viewer shows.
    fn page(&self, number: u32) -> Result<Box<dyn PageHandle + '_>, EngineError>;
}

/// One page of a decoded document
#[async_trait(?Send)]
pub trait PageHandle {
    /// Unscaled page dimensions.
    fn base_size(&self) -> PageSize;

    /// Rasterize the page for the given viewport.
    async fn render(&self, viewport: &Viewport) -> Result<RgbaImage, EngineError>;
}

/// The drawing target owned by exactly one viewer
pub trait CanvasSurface {
    /// Resize the backing surface to the viewport's pixel dimensions.
    fn set_size(&mut self, width_px: u32, height_px: u32);

    /// Replace the surface contents with a rendered page.
    fn present(&mut self, image: RgbaImage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_rounds_to_pixels() {
        let size = PageSize {
            width_pt: 612.0,
            height_pt: 792.0,
        };
        let viewport = Viewport::for_page(size, 1.2);
        assert_eq!(viewport.width_px, 734); // 612 * 1.2 = 734.4
        assert_eq!(viewport.height_px, 950); // 792 * 1.2 = 950.4
    }

    #[test]
    fn viewport_never_collapses_to_zero() {
        let size = PageSize {
            width_pt: 0.1,
            height_pt: 0.1,
        };
        let viewport = Viewport::for_page(size, 0.5);
        assert_eq!(viewport.width_px, 1);
        assert_eq!(viewport.height_px, 1);
    }
}
