//! Type aliases for commonly used shared types.
//!
//! Elements, listeners and render sets are shared between the rendering
//! thread, touch dispatch and data-source loaders, so most of them live
//! behind `Arc` and a `parking_lot` lock.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geoedit_core::types::*;
//!
//! // Instead of: Arc<RwLock<Vec<Arc<VectorElement>>>>
//! let elements: ThreadSafeRwVec<SharedElement> = thread_safe_rw_vec();
//! ```

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::element::VectorElement;

/// A vector element shared between a data source and its layers.
pub type SharedElement = Arc<VectorElement>;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// A thread-safe reader-writer vector.
pub type ThreadSafeRwVec<T> = Arc<RwLock<Vec<T>>>;

/// A thread-safe hash map for cross-thread key-value storage.
pub type ThreadSafeMap<K, V> = Arc<Mutex<HashMap<K, V>>>;

/// Create a new empty thread-safe reader-writer vector.
#[inline]
pub fn thread_safe_rw_vec<T>() -> ThreadSafeRwVec<T> {
    Arc::new(RwLock::new(Vec::new()))
}

/// Create a new empty thread-safe map.
#[inline]
pub fn thread_safe_map<K, V>() -> ThreadSafeMap<K, V> {
    Arc::new(Mutex::new(HashMap::new()))
}
