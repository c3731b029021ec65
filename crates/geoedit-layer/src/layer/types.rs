//! State held behind the layer lock.

use std::sync::Arc;

use geoedit_core::{Geometry, MapPos, SharedElement};

use crate::listener::DragMode;
use crate::selection_manager::SelectionManager;

/// State of an in-progress drag gesture.
///
/// A session is created by a pointer-down the listener accepted with
/// `Modify` and lives until pointer-up, a `Stop`/`Delete` decision or a
/// selection change.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    pub mode: DragMode,
    /// Element the gesture edits, captured at pointer-down.
    pub element: Option<SharedElement>,
    /// Overlay handle being dragged in vertex mode.
    pub point: Option<SharedElement>,
    /// Element geometry at pointer-down, the base of element-mode moves.
    pub geometry: Option<Arc<Geometry>>,
    /// Map position of the pointer-down in element mode.
    pub anchor: MapPos,
    pub started: bool,
}

impl DragSession {
    pub fn reset(&mut self) {
        *self = DragSession::default();
    }
}

/// Mutable layer state. Only touched while the layer lock is held and
/// never borrowed across a listener call.
#[derive(Debug, Default)]
pub(crate) struct EditState {
    pub selection: SelectionManager,
    pub overlay_points: Vec<SharedElement>,
    pub drag: DragSession,
}
