//! Edit event listener interface
//!
//! The listener arbitrates every interactive edit: it accepts or declines
//! selections, supplies handle styles, decides what a drag gesture does and
//! receives the resulting geometry. The layer never calls a listener while
//! holding its internal lock, so implementations may call back into the
//! layer (for example to change the selection).

use geoedit_core::{Geometry, MapPos, PointStyle, SharedElement};
use std::sync::Arc;

use crate::touch::ScreenPos;

/// What a drag gesture targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    /// A single overlay handle (real vertex or virtual midpoint).
    #[default]
    Vertex,
    /// The whole selected element.
    Element,
}

/// Listener decision for a drag callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragResult {
    /// Do nothing; the touch is left to other handlers.
    #[default]
    Ignore,
    /// End the gesture without changing the geometry.
    Stop,
    /// Apply the dragged position.
    Modify,
    /// Delete the dragged vertex, or the element in element mode.
    Delete,
}

/// Which overlay handle style is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPointStyle {
    /// Real vertex handle.
    Normal,
    /// Midpoint handle that inserts a vertex when dragged.
    Virtual,
    /// Handle currently being dragged.
    Selected,
}

/// Context passed to drag callbacks.
#[derive(Debug, Clone)]
pub struct DragInfo {
    pub element: SharedElement,
    pub mode: DragMode,
    pub screen_pos: ScreenPos,
    pub map_pos: MapPos,
}

/// Listener trait for vector edit events
///
/// Implementations own persistence: `on_element_modify` must hand the new
/// geometry to the data source (which replaces the element's geometry) or
/// the overlay handles will keep reflecting the old geometry.
pub trait VectorEditEventListener: Send + Sync {
    /// Called before an element becomes selected; return false to decline.
    fn on_element_select(&self, _element: &SharedElement) -> bool {
        true
    }

    /// Called after an element lost the selection.
    fn on_element_deselected(&self, _element: &SharedElement) {}

    /// Style of the overlay handles of a newly selected element. Handles
    /// without a style are neither drawn nor draggable.
    fn on_select_drag_point_style(
        &self,
        _element: &SharedElement,
        style: DragPointStyle,
    ) -> Option<PointStyle> {
        Some(default_drag_point_style(style))
    }

    fn on_drag_start(&self, _info: &DragInfo) -> DragResult {
        DragResult::Ignore
    }

    fn on_drag_move(&self, _info: &DragInfo) -> DragResult {
        DragResult::Ignore
    }

    fn on_drag_end(&self, _info: &DragInfo) -> DragResult {
        DragResult::Ignore
    }

    /// The element's geometry was edited; `geometry` is a new value.
    fn on_element_modify(&self, element: &SharedElement, geometry: Arc<Geometry>);

    /// The element should be removed from its data source.
    fn on_element_delete(&self, element: &SharedElement);
}

/// Handle styles used when a listener does not provide its own.
pub fn default_drag_point_style(style: DragPointStyle) -> PointStyle {
    use geoedit_core::Color;
    match style {
        DragPointStyle::Normal => PointStyle::new(Color::new(255, 255, 255, 255), 20.0),
        DragPointStyle::Virtual => PointStyle::new(Color::new(255, 255, 255, 128), 16.0),
        DragPointStyle::Selected => PointStyle::new(Color::new(255, 196, 0, 255), 24.0),
    }
}
