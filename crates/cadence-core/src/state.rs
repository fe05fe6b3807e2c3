//! Shared routine state
//!
//! Leaves sometimes need routine-wide context (e.g. which game piece the
//! robot is currently carrying) to pick their setpoints. That context is
//! injected through a [`StateHandle`] cloned into each interested command at
//! construction time; there are no ambient statics.

use std::sync::Arc;

use parking_lot::RwLock;

/// Clonable handle to routine-wide shared state
pub struct StateHandle<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> StateHandle<T> {
    pub fn new(value: T) -> Self {
        StateHandle {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Read through a closure; the lock is held only for the closure's body
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read())
    }

    /// Write through a closure; the lock is held only for the closure's body
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Replace the whole value
    pub fn set(&self, value: T) {
        *self.inner.write() = value;
    }
}

impl<T: Clone> StateHandle<T> {
    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.inner.read().clone()
    }
}

impl<T> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        StateHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for StateHandle<T> {
    fn default() -> Self {
        StateHandle::new(T::default())
    }
}
