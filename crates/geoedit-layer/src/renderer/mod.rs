//! Rendering collaborators
//!
//! - [`MapRenderer`]: the host renderer a layer is attached to
//! - [`HeadlessMapRenderer`]: recording implementation without a GPU
//! - [`ElementRenderer`]: per-layer render set with ray queries
//! - [`ViewState`]: camera and screen/world conversion

pub mod element_renderer;
pub mod view_state;

pub use element_renderer::{ElementRenderer, RayIntersectedElement};
pub use view_state::{Ray, ViewState};

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use geoedit_core::{Color, ProjectionSurface, SharedElement};

/// Host renderer services used by a layer.
pub trait MapRenderer: Send + Sync {
    fn view_state(&self) -> ViewState;

    /// `None` until the renderer has a surface to place positions on.
    fn projection_surface(&self) -> Option<Arc<dyn ProjectionSurface>>;

    fn request_redraw(&self);

    /// Redirects drawing into an offscreen buffer cleared to `color`.
    fn clear_and_bind_screen_fbo(&self, color: Color);

    /// Composites the offscreen buffer onto the screen with `opacity`.
    fn blend_and_unbind_screen_fbo(&self, opacity: f32);

    fn draw_elements(&self, elements: &[SharedElement], view_state: &ViewState);
}

/// A call recorded by [`HeadlessMapRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ClearAndBind(Color),
    Draw { elements: usize },
    BlendAndUnbind(f32),
}

/// Map renderer that records draw calls instead of rasterizing.
pub struct HeadlessMapRenderer {
    view_state: RwLock<ViewState>,
    surface: RwLock<Option<Arc<dyn ProjectionSurface>>>,
    redraw_requests: AtomicUsize,
    commands: Mutex<Vec<RenderCommand>>,
}

impl HeadlessMapRenderer {
    pub fn new(view_state: ViewState, surface: Option<Arc<dyn ProjectionSurface>>) -> Self {
        Self {
            view_state: RwLock::new(view_state),
            surface: RwLock::new(surface),
            redraw_requests: AtomicUsize::new(0),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn set_view_state(&self, view_state: ViewState) {
        *self.view_state.write() = view_state;
    }

    pub fn set_projection_surface(&self, surface: Option<Arc<dyn ProjectionSurface>>) {
        *self.surface.write() = surface;
    }

    pub fn redraw_requests(&self) -> usize {
        self.redraw_requests.load(Ordering::SeqCst)
    }

    /// Returns and clears the recorded commands.
    pub fn take_commands(&self) -> Vec<RenderCommand> {
        std::mem::take(&mut *self.commands.lock())
    }
}

impl MapRenderer for HeadlessMapRenderer {
    fn view_state(&self) -> ViewState {
        self.view_state.read().clone()
    }

    fn projection_surface(&self) -> Option<Arc<dyn ProjectionSurface>> {
        self.surface.read().clone()
    }

    fn request_redraw(&self) {
        self.redraw_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn clear_and_bind_screen_fbo(&self, color: Color) {
        self.commands.lock().push(RenderCommand::ClearAndBind(color));
    }

    fn blend_and_unbind_screen_fbo(&self, opacity: f32) {
        self.commands.lock().push(RenderCommand::BlendAndUnbind(opacity));
    }

    fn draw_elements(&self, elements: &[SharedElement], _view_state: &ViewState) {
        self.commands.lock().push(RenderCommand::Draw {
            elements: elements.len(),
        });
    }
}
