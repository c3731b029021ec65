//! Vector data sources
//!
//! A data source owns the elements a layer shows and notifies registered
//! listeners about changes. Listeners are always notified after the source
//! released its own locks, so they may read the source back.

use geoedit_core::{
    is_same_element, thread_safe_map, thread_safe_rw_vec, Error, Geometry, Projection, Result,
    SharedElement, ThreadSafeMap, ThreadSafeRwVec,
};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Registration token returned by [`DataSource::register_change_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(Uuid);

impl ListenerHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Change notifications of a data source.
pub trait DataSourceListener: Send + Sync {
    fn on_element_added(&self, element: &SharedElement);

    fn on_element_changed(&self, element: &SharedElement);

    fn on_element_removed(&self, element: &SharedElement);

    fn on_elements_added(&self, elements: &[SharedElement]);

    fn on_elements_changed(&self);

    fn on_elements_removed(&self);
}

/// Provider of vector elements.
pub trait DataSource: Send + Sync {
    fn projection(&self) -> Arc<dyn Projection>;

    /// Snapshot of all elements currently held.
    fn elements(&self) -> Vec<SharedElement>;

    fn register_change_listener(&self, listener: Arc<dyn DataSourceListener>) -> ListenerHandle;

    /// Returns false when the handle was not registered.
    fn unregister_change_listener(&self, handle: &ListenerHandle) -> bool;
}

/// In-memory data source.
pub struct LocalVectorDataSource {
    projection: Arc<dyn Projection>,
    elements: ThreadSafeRwVec<SharedElement>,
    listeners: ThreadSafeMap<ListenerHandle, Arc<dyn DataSourceListener>>,
}

impl LocalVectorDataSource {
    pub fn new(projection: Arc<dyn Projection>) -> Self {
        Self {
            projection,
            elements: thread_safe_rw_vec(),
            listeners: thread_safe_map(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }

    pub fn get(&self, id: i64) -> Option<SharedElement> {
        self.elements.read().iter().find(|e| e.id() == id).cloned()
    }

    pub fn add(&self, element: SharedElement) {
        self.elements.write().push(element.clone());
        tracing::trace!("Added element {}", element.id());
        for listener in self.listener_snapshot() {
            listener.on_element_added(&element);
        }
    }

    pub fn add_all(&self, elements: Vec<SharedElement>) {
        if elements.is_empty() {
            return;
        }
        self.elements.write().extend(elements.iter().cloned());
        for listener in self.listener_snapshot() {
            listener.on_elements_added(&elements);
        }
    }

    /// Removes an element, matching by identity.
    pub fn remove(&self, element: &SharedElement) -> Result<()> {
        let removed = {
            let mut elements = self.elements.write();
            let index = elements
                .iter()
                .position(|e| is_same_element(Some(e), Some(element)))
                .ok_or(Error::ElementNotFound { id: element.id() })?;
            elements.remove(index)
        };
        tracing::trace!("Removed element {}", removed.id());
        for listener in self.listener_snapshot() {
            listener.on_element_removed(&removed);
        }
        Ok(())
    }

    pub fn remove_all(&self) {
        let removed = std::mem::take(&mut *self.elements.write());
        if removed.is_empty() {
            return;
        }
        for listener in self.listener_snapshot() {
            listener.on_elements_removed();
        }
    }

    /// Replaces the geometry of a held element and notifies listeners.
    pub fn set_geometry(&self, element: &SharedElement, geometry: Arc<Geometry>) -> Result<()> {
        let held = self
            .elements
            .read()
            .iter()
            .find(|e| is_same_element(Some(e), Some(element)))
            .cloned()
            .ok_or(Error::ElementNotFound { id: element.id() })?;
        held.set_geometry(geometry);
        for listener in self.listener_snapshot() {
            listener.on_element_changed(&held);
        }
        Ok(())
    }

    /// Signals that elements were changed in place (for example restyled).
    pub fn notify_all_changed(&self) {
        for listener in self.listener_snapshot() {
            listener.on_elements_changed();
        }
    }

    fn listener_snapshot(&self) -> Vec<Arc<dyn DataSourceListener>> {
        self.listeners.lock().values().cloned().collect()
    }
}

impl DataSource for LocalVectorDataSource {
    fn projection(&self) -> Arc<dyn Projection> {
        self.projection.clone()
    }

    fn elements(&self) -> Vec<SharedElement> {
        self.elements.read().clone()
    }

    fn register_change_listener(&self, listener: Arc<dyn DataSourceListener>) -> ListenerHandle {
        let handle = ListenerHandle::new();
        self.listeners.lock().insert(handle, listener);
        tracing::debug!("Registered data source listener {}", handle);
        handle
    }

    fn unregister_change_listener(&self, handle: &ListenerHandle) -> bool {
        self.listeners.lock().remove(handle).is_some()
    }
}
