//! Editable vector layer
//!
//! [`EditableVectorLayer`] shows the elements of a data source and lets a
//! [`VectorEditEventListener`] edit the selected one through overlay
//! handles. The layer is split over several files:
//! - `render_set.rs`: render set building, overlay sync and drawing
//! - `editing.rs`: applying geometry edits through the listener
//! - `drag.rs`: the touch driven drag state machine
//! - `adapters.rs`: weak-handle adapters registered with collaborators

mod adapters;
mod drag;
mod editing;
mod render_set;
mod types;

pub use types::DragSession;

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use geoedit_core::{
    EditorConfig, LayerEvent, LayerEventDispatcher, Result, SharedElement, ThreadSafeRw,
};

use crate::data_source::{DataSource, ListenerHandle};
use crate::listener::{DragPointStyle, VectorEditEventListener};
use crate::overlay::OverlayStyles;
use crate::renderer::{ElementRenderer, MapRenderer};
use crate::touch::{OnTouchListener, TouchHandler};

use adapters::{DataSourceAdapter, TouchAdapter};
use types::EditState;

/// Vector layer with interactive geometry editing.
pub struct EditableVectorLayer {
    data_source: Arc<dyn DataSource>,
    config: EditorConfig,
    state: ReentrantMutex<RefCell<EditState>>,
    renderer: ElementRenderer,
    overlay_renderer: ElementRenderer,
    listener: ThreadSafeRw<Option<Arc<dyn VectorEditEventListener>>>,
    map_renderer: RwLock<Option<Weak<dyn MapRenderer>>>,
    touch_handler: RwLock<Option<Weak<dyn TouchHandler>>>,
    touch_listener: Mutex<Option<Arc<dyn OnTouchListener>>>,
    data_source_listener: Mutex<Option<ListenerHandle>>,
    opacity: Mutex<f32>,
    visible: AtomicBool,
    events: LayerEventDispatcher,
    weak_self: Weak<EditableVectorLayer>,
}

impl EditableVectorLayer {
    pub fn new(data_source: Arc<dyn DataSource>) -> Arc<Self> {
        Self::build(data_source, EditorConfig::default())
    }

    /// Creates a layer with custom tunables. Fails on an invalid config.
    pub fn with_config(data_source: Arc<dyn DataSource>, config: EditorConfig) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Self::build(data_source, config))
    }

    fn build(data_source: Arc<dyn DataSource>, config: EditorConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            data_source,
            state: ReentrantMutex::new(RefCell::new(EditState::default())),
            renderer: ElementRenderer::new("elements", config.element_pick_tolerance_px),
            overlay_renderer: ElementRenderer::new("overlay", config.overlay_pick_padding_px),
            listener: Arc::new(RwLock::new(None)),
            map_renderer: RwLock::new(None),
            touch_handler: RwLock::new(None),
            touch_listener: Mutex::new(None),
            data_source_listener: Mutex::new(None),
            opacity: Mutex::new(1.0),
            visible: AtomicBool::new(true),
            events: LayerEventDispatcher::new(config.event_channel_capacity),
            weak_self: weak_self.clone(),
            config,
        })
    }

    pub fn data_source(&self) -> &Arc<dyn DataSource> {
        &self.data_source
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn events(&self) -> &LayerEventDispatcher {
        &self.events
    }

    /// Render set of the data source elements.
    pub fn renderer(&self) -> &ElementRenderer {
        &self.renderer
    }

    /// Render set of the overlay handles.
    pub fn overlay_renderer(&self) -> &ElementRenderer {
        &self.overlay_renderer
    }

    /// Current overlay handles in slot order.
    pub fn overlay_points(&self) -> Vec<SharedElement> {
        self.state.lock().borrow().overlay_points.clone()
    }

    /// Snapshot of the drag session.
    pub fn drag_session(&self) -> DragSession {
        self.state.lock().borrow().drag.clone()
    }

    pub fn vector_edit_event_listener(&self) -> Option<Arc<dyn VectorEditEventListener>> {
        self.listener.read().clone()
    }

    /// Without a listener the layer only renders; selection and drags are
    /// inert.
    pub fn set_vector_edit_event_listener(&self, listener: Option<Arc<dyn VectorEditEventListener>>) {
        *self.listener.write() = listener;
    }

    pub fn map_renderer(&self) -> Option<Arc<dyn MapRenderer>> {
        self.map_renderer.read().as_ref().and_then(Weak::upgrade)
    }

    /// Attaches the layer to a renderer and a touch source. Passing `None`
    /// for the renderer detaches the layer from its data source as well.
    ///
    /// Both collaborators are held weakly; the host owns them.
    pub fn set_components(
        &self,
        map_renderer: Option<&Arc<dyn MapRenderer>>,
        touch_handler: Option<&Arc<dyn TouchHandler>>,
    ) {
        self.unregister_touch_listener();
        *self.map_renderer.write() = map_renderer.map(Arc::downgrade);

        if let Some(handler) = touch_handler {
            let listener: Arc<dyn OnTouchListener> = Arc::new(TouchAdapter::new(self.weak_self.clone()));
            handler.register_on_touch_listener(listener.clone());
            *self.touch_listener.lock() = Some(listener);
            *self.touch_handler.write() = Some(Arc::downgrade(handler));
        }

        if map_renderer.is_some() {
            self.register_data_source_listener();
            self.refresh();
        } else {
            self.unregister_data_source_listener();
        }
    }

    fn register_data_source_listener(&self) {
        let mut handle = self.data_source_listener.lock();
        if handle.is_none() {
            let adapter = Arc::new(DataSourceAdapter::new(self.weak_self.clone()));
            *handle = Some(self.data_source.register_change_listener(adapter));
        }
    }

    fn unregister_data_source_listener(&self) {
        if let Some(handle) = self.data_source_listener.lock().take() {
            self.data_source.unregister_change_listener(&handle);
        }
    }

    fn unregister_touch_listener(&self) {
        let handler = self.touch_handler.write().take().and_then(|h| h.upgrade());
        let listener = self.touch_listener.lock().take();
        if let (Some(handler), Some(listener)) = (handler, listener) {
            handler.unregister_on_touch_listener(&listener);
        }
    }

    pub fn opacity(&self) -> f32 {
        *self.opacity.lock()
    }

    /// Opacity in `0.0..=1.0`; out of range values are clamped.
    pub fn set_opacity(&self, opacity: f32) {
        *self.opacity.lock() = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        self.redraw();
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
        self.redraw();
    }

    pub fn selected_vector_element(&self) -> Option<SharedElement> {
        self.state.lock().borrow().selection.selected()
    }

    /// Changes the selection.
    ///
    /// The listener is told about the deselected element and may decline
    /// the new one, in which case nothing stays selected. Any drag in
    /// progress is abandoned.
    pub fn set_selected_vector_element(&self, element: Option<SharedElement>) {
        let previous = {
            let guard = self.state.lock();
            let mut state = guard.borrow_mut();
            if state.selection.is_current(element.as_ref()) {
                return;
            }
            state.drag.reset();
            state.overlay_points.clear();
            state.selection.take()
        };

        let mut selected_id = None;
        if let Some(listener) = self.vector_edit_event_listener() {
            if let Some(previous) = previous.as_ref() {
                listener.on_element_deselected(previous);
            }
            if let Some(element) = element {
                if listener.on_element_select(&element) {
                    let styles = OverlayStyles {
                        normal: listener.on_select_drag_point_style(&element, DragPointStyle::Normal),
                        virtual_point: listener
                            .on_select_drag_point_style(&element, DragPointStyle::Virtual),
                        selected: listener
                            .on_select_drag_point_style(&element, DragPointStyle::Selected),
                    };
                    selected_id = Some(element.id());
                    let guard = self.state.lock();
                    guard.borrow_mut().selection.select(element, styles);
                } else {
                    tracing::debug!("Listener declined selection of element {}", element.id());
                }
            }
        }

        tracing::debug!("Selection changed to {:?}", selected_id);
        self.events.publish(LayerEvent::SelectionChanged { id: selected_id });
        self.refresh();
    }

    /// Asks the map renderer for a new frame.
    pub fn redraw(&self) {
        self.events.publish(LayerEvent::RedrawRequested);
        if let Some(map_renderer) = self.map_renderer() {
            map_renderer.request_redraw();
        }
    }
}

impl Drop for EditableVectorLayer {
    fn drop(&mut self) {
        self.unregister_touch_listener();
        self.unregister_data_source_listener();
    }
}
