//! Touch driven drag state machine.
//!
//! ```text
//! Idle --down/handle hit--> vertex drag  --move*--> --up--> Idle
//! Idle --down/element hit-> element drag --move*--> --up--> Idle
//! ```
//!
//! The listener decides every transition. A drag captures the element at
//! pointer-down and keeps editing that element for the rest of the gesture.

use std::sync::Arc;

use geoedit_core::{MapPos, Projection, ProjectionSurface, SharedElement};

use crate::listener::{DragInfo, DragMode, DragResult, VectorEditEventListener};
use crate::renderer::{Ray, ViewState};
use crate::touch::{ScreenPos, TouchAction};

use super::{DragSession, EditableVectorLayer};

/// Pointer position resolved against the current view.
struct TouchContext {
    view_state: ViewState,
    ray: Ray,
    projection: Arc<dyn Projection>,
    surface: Arc<dyn ProjectionSurface>,
    screen_pos: ScreenPos,
    map_pos: MapPos,
}

impl EditableVectorLayer {
    /// Handles a pointer event. Returns true when the event was consumed.
    ///
    /// Events are ignored while nothing is selected or the layer has no
    /// renderer, projection surface or world position for the pointer.
    pub fn on_touch_event(&self, action: TouchAction, screen_pos1: ScreenPos, _screen_pos2: ScreenPos) -> bool {
        let Some(selected) = self.selected_vector_element() else {
            return false;
        };
        let Some(map_renderer) = self.map_renderer() else {
            return false;
        };
        let Some(surface) = map_renderer.projection_surface() else {
            return false;
        };
        let view_state = map_renderer.view_state();
        let Some(ray) = view_state.screen_ray(screen_pos1) else {
            return false;
        };
        let projection = self.data_source.projection();
        let map_pos = projection.from_internal(surface.calculate_map_pos(ray.target()));

        let touch = TouchContext {
            view_state,
            ray,
            projection,
            surface,
            screen_pos: screen_pos1,
            map_pos,
        };

        match action {
            TouchAction::Pointer1Down => self.on_drag_start(&selected, &touch),
            TouchAction::Move => self.on_drag_move(&touch),
            TouchAction::Pointer1Up => self.on_drag_end(&touch),
            _ => false,
        }
    }

    fn on_drag_start(&self, selected: &SharedElement, touch: &TouchContext) -> bool {
        let handle_hit = self
            .overlay_renderer
            .calculate_ray_intersected_elements(
                &touch.ray,
                &touch.view_state,
                touch.projection.as_ref(),
                touch.surface.as_ref(),
            )
            .into_iter()
            .next();

        if let Some(hit) = handle_hit {
            let point = hit.element;
            self.with_drag(|drag| {
                drag.mode = DragMode::Vertex;
                drag.element = Some(selected.clone());
                drag.point = Some(point.clone());
            });
            match self.arbitrate(selected, DragMode::Vertex, touch, |l, info| l.on_drag_start(info)) {
                DragResult::Ignore => self.with_drag(DragSession::reset),
                DragResult::Stop => {
                    self.with_drag(DragSession::reset);
                    return true;
                }
                DragResult::Modify => {
                    self.mark_started(selected);
                    self.update_element_point(selected, &point, touch.map_pos);
                    return true;
                }
                DragResult::Delete => {
                    self.with_drag(DragSession::reset);
                    self.remove_element_point(selected, &point);
                    return true;
                }
            }
        }

        let element_hit = self
            .renderer
            .calculate_ray_intersected_elements(
                &touch.ray,
                &touch.view_state,
                touch.projection.as_ref(),
                touch.surface.as_ref(),
            )
            .iter()
            .any(|hit| Arc::ptr_eq(&hit.element, selected));
        if !element_hit {
            return false;
        }

        let geometry = selected.geometry();
        self.with_drag(|drag| {
            drag.mode = DragMode::Element;
            drag.element = Some(selected.clone());
            drag.geometry = Some(geometry.clone());
            drag.anchor = touch.map_pos;
        });
        match self.arbitrate(selected, DragMode::Element, touch, |l, info| l.on_drag_start(info)) {
            DragResult::Ignore => {
                self.with_drag(DragSession::reset);
                false
            }
            // an element-level stop lets the touch fall through to the map
            DragResult::Stop => {
                self.with_drag(DragSession::reset);
                false
            }
            DragResult::Modify => {
                self.mark_started(selected);
                self.update_element_geometry(selected, geometry, touch.map_pos, touch.map_pos);
                true
            }
            DragResult::Delete => {
                self.with_drag(DragSession::reset);
                self.remove_element(selected);
                true
            }
        }
    }

    fn on_drag_move(&self, touch: &TouchContext) -> bool {
        let session = self.drag_session();
        let Some(element) = session.element.clone().filter(|_| session.started) else {
            return false;
        };

        match self.arbitrate(&element, session.mode, touch, |l, info| l.on_drag_move(info)) {
            DragResult::Ignore => false,
            DragResult::Stop => {
                self.with_drag(DragSession::reset);
                self.refresh();
                true
            }
            DragResult::Modify => {
                self.apply_drag(&session, &element, touch.map_pos);
                true
            }
            DragResult::Delete => {
                self.with_drag(DragSession::reset);
                self.delete_drag_target(&session, &element);
                true
            }
        }
    }

    fn on_drag_end(&self, touch: &TouchContext) -> bool {
        let session = self.drag_session();
        let Some(element) = session.element.clone().filter(|_| session.started) else {
            return false;
        };

        let result = self.arbitrate(&element, session.mode, touch, |l, info| l.on_drag_end(info));
        self.with_drag(DragSession::reset);
        let consumed = match result {
            DragResult::Ignore => false,
            DragResult::Stop => true,
            DragResult::Modify => {
                self.apply_drag(&session, &element, touch.map_pos);
                true
            }
            DragResult::Delete => {
                self.delete_drag_target(&session, &element);
                true
            }
        };
        self.refresh();
        consumed
    }

    fn apply_drag(&self, session: &DragSession, element: &SharedElement, map_pos: MapPos) {
        match session.mode {
            DragMode::Vertex => {
                if let Some(point) = &session.point {
                    self.update_element_point(element, point, map_pos);
                }
            }
            DragMode::Element => {
                if let Some(geometry) = &session.geometry {
                    self.update_element_geometry(element, geometry.clone(), session.anchor, map_pos);
                }
            }
        }
    }

    fn delete_drag_target(&self, session: &DragSession, element: &SharedElement) {
        match session.mode {
            DragMode::Vertex => {
                if let Some(point) = &session.point {
                    self.remove_element_point(element, point);
                }
            }
            DragMode::Element => self.remove_element(element),
        }
    }

    /// Calls the listener outside the layer lock. Without a listener every
    /// decision is `Ignore`.
    fn arbitrate<F>(&self, element: &SharedElement, mode: DragMode, touch: &TouchContext, decide: F) -> DragResult
    where
        F: FnOnce(&dyn VectorEditEventListener, &DragInfo) -> DragResult,
    {
        let Some(listener) = self.vector_edit_event_listener() else {
            return DragResult::Ignore;
        };
        let info = DragInfo {
            element: element.clone(),
            mode,
            screen_pos: touch.screen_pos,
            map_pos: touch.map_pos,
        };
        decide(listener.as_ref(), &info)
    }

    /// Starts the session armed for `element`, unless the listener replaced
    /// it meanwhile (for example by changing the selection).
    fn mark_started(&self, element: &SharedElement) {
        self.with_drag(|drag| {
            if drag.element.as_ref().is_some_and(|e| Arc::ptr_eq(e, element)) {
                drag.started = true;
            }
        });
    }

    fn with_drag<R>(&self, f: impl FnOnce(&mut DragSession) -> R) -> R {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        f(&mut state.drag)
    }
}
