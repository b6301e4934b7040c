//! Shared key/value state for modules.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::StateKey;

/// A value held in the state store.
///
/// Values are type-erased at the store boundary; readers downcast to the
/// type agreed on for the key.
pub type StateValue = Arc<dyn Any + Send + Sync>;

/// Thread-safe storage for values shared between modules.
///
/// Reads take a shared lock and writes an exclusive one, so a reader never
/// observes a partially written value. Last write wins.
#[derive(Default)]
pub struct StateStore {
    values: RwLock<HashMap<String, StateValue>>,
}

impl StateStore {
    /// Create a new empty state store.
    pub fn new() -> Self {
        Self::default()
    }

    // A writer that panicked cannot leave a half-inserted entry behind, so a
    // poisoned map is still consistent and lookups stay infallible.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, StateValue>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, StateValue>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T>(&self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.set_value(key, Arc::new(value));
    }

    /// Store an already type-erased value under `key`.
    pub fn set_value(&self, key: impl Into<String>, value: StateValue) {
        self.write().insert(key.into(), value);
    }

    /// Get the type-erased value stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<StateValue> {
        self.read().get(key).cloned()
    }

    /// Get a clone of the value stored under `key`.
    ///
    /// Returns `None` if the key was never set or holds a value of another
    /// type.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        let value = self.get_value(key)?;
        (*value).downcast_ref::<T>().cloned()
    }

    /// Store a value in a typed slot.
    pub fn set_key<T>(&self, key: &StateKey<T>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.set(key.name(), value);
    }

    /// Read a value from a typed slot.
    pub fn get_key<T>(&self, key: &StateKey<T>) -> Option<T>
    where
        T: Any + Clone,
    {
        self.get(key.name())
    }

    /// Atomically replace the value under `key` with `f(current)`.
    ///
    /// `current` is `None` when the key is unset or holds another type.
    /// The write lock is held for the duration of `f`.
    pub fn update<T, F>(&self, key: &str, f: F) -> T
    where
        T: Any + Send + Sync + Clone,
        F: FnOnce(Option<T>) -> T,
    {
        let mut values = self.write();
        let current = values
            .get(key)
            .and_then(|value| (**value).downcast_ref::<T>().cloned());
        let next = f(current);
        values.insert(key.to_string(), Arc::new(next.clone()));
        next
    }

    /// Check if a key has been set.
    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Remove a key, returning its value if it was set.
    pub fn remove(&self, key: &str) -> Option<StateValue> {
        self.write().remove(key)
    }

    /// List all keys currently set.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Get the number of keys in the store.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys = self.keys();
        keys.sort();
        f.debug_struct("StateStore").field("keys", &keys).finish()
    }
}
