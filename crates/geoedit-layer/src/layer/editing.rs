//! Applying geometry edits.
//!
//! Every edit computes a new geometry under the layer lock, then hands it
//! to the listener outside the lock, resyncs the overlay and requests a
//! redraw.

use std::sync::Arc;

use geoedit_core::{Geometry, LayerEvent, MapPos, SharedElement};

use crate::mutation::{self, GeometryEdit};
use crate::overlay::apply_overlay_deltas;

use super::EditableVectorLayer;

impl EditableVectorLayer {
    /// Moves the vertex under `drag_point`, or inserts a vertex when the
    /// handle is a midpoint.
    pub(crate) fn update_element_point(
        &self,
        element: &SharedElement,
        drag_point: &SharedElement,
        map_pos: MapPos,
    ) {
        let geometry = element.geometry();
        let edit = self.edit_at_drag_point(drag_point, |index| {
            mutation::update_point(&geometry, index, map_pos)
        });
        if let Some(edit) = edit {
            self.finish_edit(element, edit.geometry);
        }
    }

    /// Removes the vertex under `drag_point`.
    pub(crate) fn remove_element_point(&self, element: &SharedElement, drag_point: &SharedElement) {
        let geometry = element.geometry();
        let edit = self.edit_at_drag_point(drag_point, |index| mutation::remove_point(&geometry, index));
        if let Some(edit) = edit {
            self.finish_edit(element, edit.geometry);
        }
    }

    /// Translates `geometry` so that `origin` moves to `target` and hands
    /// the result to the listener as the element's new geometry.
    pub(crate) fn update_element_geometry(
        &self,
        element: &SharedElement,
        geometry: Arc<Geometry>,
        origin: MapPos,
        target: MapPos,
    ) {
        let Some(surface) = self.map_renderer().and_then(|r| r.projection_surface()) else {
            tracing::debug!("Projection surface not available, element {} not moved", element.id());
            return;
        };
        let projection = self.data_source.projection();
        let moved = mutation::translate(&geometry, origin, target, projection.as_ref(), surface.as_ref());
        self.finish_edit(element, Some(moved));
    }

    /// Asks the listener to delete the element and clears the overlay.
    pub fn remove_element(&self, element: &SharedElement) {
        self.finish_edit(element, None);
    }

    /// Runs `edit` with the slot of `drag_point` and applies the resulting
    /// overlay deltas. `None` when the handle is no longer in the overlay.
    fn edit_at_drag_point<F>(&self, drag_point: &SharedElement, edit: F) -> Option<GeometryEdit>
    where
        F: FnOnce(usize) -> GeometryEdit,
    {
        if self.vector_edit_event_listener().is_none() {
            return None;
        }
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        let Some(index) = state
            .overlay_points
            .iter()
            .position(|p| Arc::ptr_eq(p, drag_point))
        else {
            tracing::trace!("Drag point is no longer part of the overlay");
            return None;
        };
        let edit = edit(index);
        let styles = state.selection.styles().clone();
        apply_overlay_deltas(&mut state.overlay_points, &edit.overlay_deltas, &styles);
        Some(edit)
    }

    fn finish_edit(&self, element: &SharedElement, geometry: Option<Geometry>) {
        let Some(listener) = self.vector_edit_event_listener() else {
            tracing::trace!("No edit listener, edit of element {} dropped", element.id());
            return;
        };

        match geometry {
            Some(geometry) => {
                listener.on_element_modify(element, Arc::new(geometry));
                self.events.publish(LayerEvent::ElementModified { id: element.id() });
                let selected = self.selected_vector_element();
                self.sync_element_overlay_points(selected.as_ref());
            }
            None => {
                listener.on_element_delete(element);
                self.events.publish(LayerEvent::ElementDeleted { id: element.id() });
                self.sync_element_overlay_points(None);
            }
        }
        self.redraw();
    }
}
