//! Typed state slots.

use std::fmt;
use std::marker::PhantomData;

/// A state key that carries the type of its value.
///
/// Modules that share a key declare it once as a constant, so every reader
/// and writer agrees on the value type at compile time:
///
/// ```
/// use std::time::Instant;
/// use modshell::{StateKey, StateStore};
///
/// const START: StateKey<Instant> = StateKey::new("start_time");
///
/// let store = StateStore::new();
/// store.set_key(&START, Instant::now());
/// assert!(store.get_key(&START).is_some());
/// ```
pub struct StateKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    /// Create a typed key with the given name.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Get the underlying string key.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateKey").field(&self.name).finish()
    }
}

impl<T> fmt::Display for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
