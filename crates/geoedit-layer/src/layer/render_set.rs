//! Render set building, overlay sync and drawing.

use geoedit_core::{
    is_same_element, Color, LayerEvent, MapBounds, MapPos, Projection, SharedElement,
};

use crate::overlay::{build_overlay_points, overlay_point_specs};
use crate::renderer::ViewState;

use super::EditableVectorLayer;

impl EditableVectorLayer {
    /// Rebuilds the render set from the data source and resyncs the
    /// overlay of the selected element.
    pub fn refresh(&self) {
        let Some(map_renderer) = self.map_renderer() else {
            tracing::debug!("Refresh skipped, layer is not attached to a renderer");
            return;
        };
        let view_state = map_renderer.view_state();
        let projection = self.data_source.projection();

        {
            let guard = self.state.lock();
            let selected = guard.borrow().selection.selected();
            for element in self.data_source.elements() {
                if is_in_view(&element, projection.as_ref(), &view_state) {
                    self.add_renderer_element(element, selected.as_ref());
                }
            }
            self.refresh_renderer_elements(selected.as_ref());
        }

        self.events.publish(LayerEvent::RefreshRequested);
        map_renderer.request_redraw();
    }

    /// Stages an element unless it is the selection, which is always added
    /// by [`Self::refresh_renderer_elements`].
    fn add_renderer_element(&self, element: SharedElement, selected: Option<&SharedElement>) {
        if !is_same_element(Some(&element), selected) {
            self.renderer.add_element(element);
        }
    }

    fn refresh_renderer_elements(&self, selected: Option<&SharedElement>) {
        if let Some(selected) = selected {
            self.renderer.add_element(selected.clone());
        }
        self.renderer.refresh_elements();
        self.sync_element_overlay_points(selected);
    }

    /// Updates a single element of the active render set after a data
    /// source notification.
    pub(crate) fn refresh_element(&self, element: &SharedElement, remove: bool) {
        {
            let guard = self.state.lock();
            let (selected, is_selected) = {
                let state = guard.borrow();
                (state.selection.selected(), state.selection.is_selected(element))
            };
            if is_selected {
                self.sync_element_overlay_points(selected.as_ref());
            }

            let projection = self.data_source.projection();
            let in_view = self
                .map_renderer()
                .is_some_and(|r| is_in_view(element, projection.as_ref(), &r.view_state()));
            if !remove && (in_view || is_selected) {
                self.renderer.update_element(element.clone());
            } else {
                self.renderer.remove_element(element);
            }
        }
        self.redraw();
    }

    /// Rebuilds the overlay handles of `element`. The overlay is empty when
    /// the element is absent, invisible or no projection surface exists.
    pub(crate) fn sync_element_overlay_points(&self, element: Option<&SharedElement>) {
        let surface = self.map_renderer().and_then(|r| r.projection_surface());
        let specs = match (element, surface) {
            (Some(element), Some(surface)) if element.is_visible() => {
                let projection = self.data_source.projection();
                overlay_point_specs(&element.geometry(), projection.as_ref(), surface.as_ref())
            }
            (Some(_), None) => {
                tracing::debug!("Projection surface not available, overlay cleared");
                Vec::new()
            }
            _ => Vec::new(),
        };

        let count = {
            let guard = self.state.lock();
            let points = {
                let mut state = guard.borrow_mut();
                let drag_point = state.drag.point.clone();
                let points = build_overlay_points(
                    &specs,
                    &state.overlay_points,
                    drag_point.as_ref(),
                    state.selection.styles(),
                );
                state.overlay_points = points.clone();
                points
            };
            let count = points.len();
            for point in points {
                self.overlay_renderer.add_element(point);
            }
            self.overlay_renderer.refresh_elements();
            count
        };

        tracing::trace!("Overlay synced with {} points", count);
        self.events.publish(LayerEvent::OverlaySynced { points: count });
    }

    /// Draws the element set, then the overlay. With opacity below one the
    /// overlay pass goes through the screen FBO. Returns true when another
    /// frame is needed.
    pub fn on_draw_frame(&self, delta_seconds: f32, view_state: &ViewState) -> bool {
        if !self.is_visible() {
            return false;
        }
        let Some(map_renderer) = self.map_renderer() else {
            return false;
        };

        let mut needs_redraw = self
            .renderer
            .on_draw_frame(delta_seconds, view_state, map_renderer.as_ref());

        let opacity = self.opacity();
        if opacity < 1.0 {
            map_renderer.clear_and_bind_screen_fbo(Color::TRANSPARENT);
        }
        needs_redraw |= self
            .overlay_renderer
            .on_draw_frame(delta_seconds, view_state, map_renderer.as_ref());
        if opacity < 1.0 {
            map_renderer.blend_and_unbind_screen_fbo(opacity);
        }
        needs_redraw
    }
}

/// Culls elements whose bounds miss the visible area.
fn is_in_view(element: &SharedElement, projection: &dyn Projection, view_state: &ViewState) -> bool {
    let Some(bounds) = element.geometry().bounds() else {
        return false;
    };
    let min = projection.to_internal(bounds.min);
    let max = projection.to_internal(bounds.max);
    let view = view_state.visible_bounds();
    let internal = MapBounds {
        min: MapPos::new(min.x.min(max.x), min.y.min(max.y)),
        max: MapPos::new(min.x.max(max.x), min.y.max(max.y)),
    };
    internal.min.x <= view.max.x
        && internal.max.x >= view.min.x
        && internal.min.y <= view.max.y
        && internal.max.y >= view.min.y
}
