//! Collaborator callbacks into the layer.
//!
//! The layer registers these adapters with its data source and touch
//! handler. They hold the layer weakly; a callback arriving after the layer
//! was dropped is logged and ignored.

use std::sync::Weak;

use geoedit_core::{is_same_element, SharedElement};

use crate::data_source::DataSourceListener;
use crate::touch::{OnTouchListener, ScreenPos, TouchAction};

use super::EditableVectorLayer;

pub(super) struct DataSourceAdapter {
    layer: Weak<EditableVectorLayer>,
}

impl DataSourceAdapter {
    pub(super) fn new(layer: Weak<EditableVectorLayer>) -> Self {
        Self { layer }
    }

    fn with_layer(&self, f: impl FnOnce(&EditableVectorLayer)) {
        match self.layer.upgrade() {
            Some(layer) => f(&layer),
            None => tracing::error!("DataSourceAdapter: Lost connection to layer"),
        }
    }
}

impl DataSourceListener for DataSourceAdapter {
    fn on_element_added(&self, element: &SharedElement) {
        self.with_layer(|layer| layer.refresh_element(element, false));
    }

    fn on_element_changed(&self, element: &SharedElement) {
        self.with_layer(|layer| layer.refresh_element(element, false));
    }

    fn on_element_removed(&self, element: &SharedElement) {
        self.with_layer(|layer| {
            let selected = layer.selected_vector_element();
            if is_same_element(Some(element), selected.as_ref()) {
                layer.set_selected_vector_element(None);
            }
            layer.refresh_element(element, true);
        });
    }

    fn on_elements_added(&self, _elements: &[SharedElement]) {
        self.with_layer(EditableVectorLayer::refresh);
    }

    fn on_elements_changed(&self) {
        self.with_layer(EditableVectorLayer::refresh);
    }

    fn on_elements_removed(&self) {
        self.with_layer(|layer| {
            layer.set_selected_vector_element(None);
            layer.refresh();
        });
    }
}

pub(super) struct TouchAdapter {
    layer: Weak<EditableVectorLayer>,
}

impl TouchAdapter {
    pub(super) fn new(layer: Weak<EditableVectorLayer>) -> Self {
        Self { layer }
    }
}

impl OnTouchListener for TouchAdapter {
    fn on_touch_event(&self, action: TouchAction, screen_pos1: ScreenPos, screen_pos2: ScreenPos) -> bool {
        match self.layer.upgrade() {
            Some(layer) => layer.on_touch_event(action, screen_pos1, screen_pos2),
            None => {
                tracing::debug!("TouchAdapter: Lost connection to layer");
                false
            }
        }
    }
}
