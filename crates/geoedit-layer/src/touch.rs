//! Touch input
//!
//! Hosts forward pointer events through a [`TouchHandler`]; layers register
//! an [`OnTouchListener`] with it. Only the primary pointer drives editing.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Position in screen pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ScreenPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Pointer1Down,
    Pointer2Down,
    Move,
    Cancel,
    Pointer1Up,
    Pointer2Up,
}

/// Receiver of pointer events. Returns true when the event was consumed.
pub trait OnTouchListener: Send + Sync {
    fn on_touch_event(&self, action: TouchAction, screen_pos1: ScreenPos, screen_pos2: ScreenPos)
        -> bool;
}

/// Source of pointer events.
pub trait TouchHandler: Send + Sync {
    fn register_on_touch_listener(&self, listener: Arc<dyn OnTouchListener>);

    fn unregister_on_touch_listener(&self, listener: &Arc<dyn OnTouchListener>);
}

/// Dispatches pointer events to registered listeners, most recently
/// registered first, stopping at the first listener that consumes it.
#[derive(Default)]
pub struct TouchDispatcher {
    listeners: RwLock<Vec<Arc<dyn OnTouchListener>>>,
}

impl TouchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Returns true when a listener consumed the event. Listeners are
    /// invoked without holding the registration lock.
    pub fn dispatch(&self, action: TouchAction, screen_pos1: ScreenPos, screen_pos2: ScreenPos) -> bool {
        let listeners = self.listeners.read().clone();
        listeners
            .iter()
            .rev()
            .any(|listener| listener.on_touch_event(action, screen_pos1, screen_pos2))
    }
}

impl TouchHandler for TouchDispatcher {
    fn register_on_touch_listener(&self, listener: Arc<dyn OnTouchListener>) {
        self.listeners.write().push(listener);
    }

    fn unregister_on_touch_listener(&self, listener: &Arc<dyn OnTouchListener>) {
        self.listeners
            .write()
            .retain(|registered| !Arc::ptr_eq(registered, listener));
    }
}
