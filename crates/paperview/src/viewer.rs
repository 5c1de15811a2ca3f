//! Single-document viewer state machine
//!
//! One `Viewer` owns one open document: its pagination, zoom and fullscreen
//! state, and the render task painting the current page to the canvas. The
//! mount sequence walks `Idle → LoadingLibrary → LoadingDocument → Ready`;
//! any failure lands in `Error`, terminal until the host remounts.
//!
//! All work runs on one event loop: the viewer's futures are `!Send` and
//! must be driven from a current-thread runtime inside a
//! [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::engine::{CanvasSurface, DocumentHandle, PageHandle, Viewport};
use crate::error::ViewerError;
use crate::fetch::FetchDocument;
use crate::loader::EngineLoader;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 3.0;
pub const ZOOM_STEP: f32 = 1.25;
pub const INITIAL_SCALE: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerStatus {
    Idle,
    LoadingLibrary,
    LoadingDocument,
    Ready,
    Error,
}

/// The container the viewer can put into and take out of fullscreen.
///
/// `is_fullscreen` reports the surface's *actual* state, which is the only
/// source of truth: an OS-level escape changes it without the viewer's
/// involvement, and the host forwards that via [`Viewer::sync_fullscreen`].
pub trait FullscreenSurface {
    fn request_fullscreen(&mut self);
    fn exit_fullscreen(&mut self);
    fn is_fullscreen(&self) -> bool;
}

struct ViewerState {
    status: ViewerStatus,
    document: Option<Rc<dyn DocumentHandle>>,
    page_number: u32,
    num_pages: u32,
    scale: f32,
    is_fullscreen: bool,
    error: Option<String>,
    render_token: Option<CancelToken>,
    closed: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            status: ViewerStatus::Idle,
            document: None,
            page_number: 1,
            num_pages: 0,
            scale: INITIAL_SCALE,
            is_fullscreen: false,
            error: None,
            render_token: None,
            closed: false,
        }
    }
}

pub struct Viewer {
    state: Rc<RefCell<ViewerState>>,
    canvas: Rc<RefCell<dyn CanvasSurface>>,
    loader: Rc<EngineLoader>,
    fetcher: Rc<dyn FetchDocument>,
    fullscreen: Option<Rc<RefCell<dyn FullscreenSurface>>>,
}

impl Viewer {
    pub fn new(
        loader: Rc<EngineLoader>,
        fetcher: Rc<dyn FetchDocument>,
        canvas: Rc<RefCell<dyn CanvasSurface>>,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewerState::default())),
            canvas,
            loader,
            fetcher,
            fullscreen: None,
        }
    }

    /// Attach the container surface used by `toggle_fullscreen`.
    pub fn with_fullscreen(mut self, surface: Rc<RefCell<dyn FullscreenSurface>>) -> Self {
        self.fullscreen = Some(surface);
        self
    }

    /// Drive the mount sequence for one document URL.
    ///
    /// Failures do not propagate: they move the viewer to `Error` with a
    /// human-readable message, exactly what the host renders next to the
    /// canvas. Recovery is a fresh mount.
    pub async fn open(&self, url: &str) {
        debug!(%url, "viewer mounting");
        self.state.borrow_mut().status = ViewerStatus::LoadingLibrary;

        let engine = match self.loader.ensure_loaded().await {
            Ok(engine) => engine,
            Err(e) => return self.fail(e),
        };
        if self.is_closed() {
            return;
        }

        self.state.borrow_mut().status = ViewerStatus::LoadingDocument;
        let bytes = match self.fetcher.fetch(url).await {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(e),
        };
        if self.is_closed() {
            return;
        }

        let document = match engine.decode(&bytes) {
            Ok(document) => document,
            Err(e) => return self.fail(ViewerError::Decode(e.to_string())),
        };
        let document: Rc<dyn DocumentHandle> = Rc::from(document);

        {
            let mut state = self.state.borrow_mut();
            state.num_pages = document.page_count();
            state.page_number = 1;
            state.document = Some(document);
            state.error = None;
            state.status = ViewerStatus::Ready;
        }
        debug!(pages = self.num_pages(), "document ready");
        self.spawn_render();
    }

    /// Jump to a page, clamped to `[1, num_pages]`. A no-op outside `Ready`
    /// or when the clamped target is the current page.
    pub fn go_to_page(&self, number: u32) {
        let mut state = self.state.borrow_mut();
        if state.status != ViewerStatus::Ready || state.num_pages == 0 {
            return;
        }
        let target = number.clamp(1, state.num_pages);
        if target == state.page_number {
            return;
        }
        state.page_number = target;
        drop(state);
        self.spawn_render();
    }

    pub fn next_page(&self) {
        let current = self.state.borrow().page_number;
        self.go_to_page(current.saturating_add(1));
    }

    pub fn previous_page(&self) {
        let current = self.state.borrow().page_number;
        self.go_to_page(current.saturating_sub(1));
    }

    pub fn zoom_in(&self) {
        self.apply_scale(|scale| (scale * ZOOM_STEP).min(MAX_SCALE));
    }

    pub fn zoom_out(&self) {
        self.apply_scale(|scale| (scale / ZOOM_STEP).max(MIN_SCALE));
    }

    fn apply_scale(&self, adjust: impl FnOnce(f32) -> f32) {
        let mut state = self.state.borrow_mut();
        if state.status != ViewerStatus::Ready {
            return;
        }
        let target = adjust(state.scale);
        if (target - state.scale).abs() < f32::EPSILON {
            return;
        }
        state.scale = target;
        drop(state);
        self.spawn_render();
    }

    /// Request or leave fullscreen on the container surface. The state flag
    /// is not set here; it follows the surface via `sync_fullscreen`.
    pub fn toggle_fullscreen(&self) {
        let Some(surface) = &self.fullscreen else {
            return;
        };
        {
            let mut surface = surface.borrow_mut();
            if surface.is_fullscreen() {
                surface.exit_fullscreen();
            } else {
                surface.request_fullscreen();
            }
        }
        self.sync_fullscreen();
    }

    /// Mirror the surface's actual fullscreen status into the viewer state.
    /// Hosts call this from their fullscreen-change notification so the
    /// state stays correct when fullscreen is exited externally.
    pub fn sync_fullscreen(&self) {
        let Some(surface) = &self.fullscreen else {
            return;
        };
        let active = surface.borrow().is_fullscreen();
        self.state.borrow_mut().is_fullscreen = active;
    }

    /// Unmount: cancel outstanding work and release the document. No task
    /// started before `close` may touch the canvas afterwards.
    pub fn close(&self) {
        let mut state = self.state.borrow_mut();
        state.closed = true;
        if let Some(token) = state.render_token.take() {
            token.cancel();
        }
        state.document = None;
    }

    pub fn status(&self) -> ViewerStatus {
        self.state.borrow().status
    }

    pub fn page_number(&self) -> u32 {
        self.state.borrow().page_number
    }

    pub fn num_pages(&self) -> u32 {
        self.state.borrow().num_pages
    }

    pub fn scale(&self) -> f32 {
        self.state.borrow().scale
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.state.borrow().scale * 100.0).round() as u32
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state.borrow().is_fullscreen
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    fn fail(&self, error: ViewerError) {
        if self.is_closed() {
            return;
        }
        warn!("viewer error: {error}");
        let mut state = self.state.borrow_mut();
        state.status = ViewerStatus::Error;
        state.error = Some(error.to_string());
    }

    /// Start a render of the current page at the current scale, cancelling
    /// any render still in flight.
    fn spawn_render(&self) {
        let mut state = self.state.borrow_mut();
        let Some(document) = state.document.clone() else {
            return;
        };
        if let Some(previous) = state.render_token.take() {
            previous.cancel();
        }
        let token = CancelToken::new();
        state.render_token = Some(token.clone());
        let page_number = state.page_number;
        let scale = state.scale;
        drop(state);

        let canvas = Rc::clone(&self.canvas);
        tokio::task::spawn_local(async move {
            if let Err(e) = render_page(document, page_number, scale, canvas, token).await {
                // A failed paint leaves the previous frame in place; the
                // next page or zoom change starts a fresh task.
                warn!(page_number, "page render failed: {e}");
            }
        });
    }
}

async fn render_page(
    document: Rc<dyn DocumentHandle>,
    page_number: u32,
    scale: f32,
    canvas: Rc<RefCell<dyn CanvasSurface>>,
    token: CancelToken,
) -> Result<(), ViewerError> {
    let page = document.page(page_number)?;
    let viewport = Viewport::for_page(page.base_size(), scale);
    let image = page.render(&viewport).await?;

    // Commit only if this task is still the latest; a superseded render
    // must never touch the canvas.
    if token.is_cancelled() {
        return Ok(());
    }

    let mut canvas = canvas.borrow_mut();
    canvas.set_size(viewport.width_px, viewport.height_px);
    canvas.present(image);
    Ok(())
}
