use geoedit_core::{is_same_element, SharedElement};

use crate::overlay::OverlayStyles;

/// Tracks the selected element and the handle styles chosen for it.
///
/// `SelectionManager` holds state only. The layer drives the listener
/// protocol around it:
/// - [`SelectionManager::take`] clears the selection before the listener is
///   told about the deselected element
/// - [`SelectionManager::select`] stores the new element once the listener
///   accepted it
///
/// # Identity
///
/// Elements are compared with [`is_same_element`], so a reloaded copy of the
/// selected element (same id, different allocation) counts as selected.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Option<SharedElement>,
    styles: OverlayStyles,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<SharedElement> {
        self.selected.clone()
    }

    /// Handle styles of the current selection. Empty when nothing is selected.
    pub fn styles(&self) -> &OverlayStyles {
        &self.styles
    }

    pub fn is_selected(&self, element: &SharedElement) -> bool {
        is_same_element(self.selected.as_ref(), Some(element))
    }

    /// True when `element` would not change the selection.
    pub fn is_current(&self, element: Option<&SharedElement>) -> bool {
        is_same_element(self.selected.as_ref(), element)
    }

    /// Clears the selection and returns the previously selected element.
    pub fn take(&mut self) -> Option<SharedElement> {
        self.styles = OverlayStyles::default();
        self.selected.take()
    }

    pub fn select(&mut self, element: SharedElement, styles: OverlayStyles) {
        self.selected = Some(element);
        self.styles = styles;
    }
}
