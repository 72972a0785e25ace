//! Explicit parameter storage with lock tracking.

use crate::errors::ImmutableParameterError;
use indexmap::IndexMap;

/// Ordered parameter map as handed to the transport.
pub type ParamMap = IndexMap<String, serde_json::Value>;

/// Explicitly set parameters plus the value each locked key was first set to.
///
/// Writing a different value to a locked key raises an
/// `ImmutableParameterError`; writing the same value again is a no-op.
/// Removing a key keeps its lock record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBag {
    explicit: ParamMap,
    locked: ParamMap,
}

impl ParamBag {
    /// Creates a new empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets an explicit value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.explicit.get(key)
    }

    /// Checks if a key was explicitly set.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.explicit.contains_key(key)
    }

    /// Returns the value a key was locked to, if any.
    #[must_use]
    pub fn locked_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.locked.get(key)
    }

    /// Sets a value, locking it when `lock` is true.
    ///
    /// # Errors
    ///
    /// Returns `ImmutableParameterError` if the key is already locked to a
    /// different value.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
        lock: bool,
    ) -> Result<(), ImmutableParameterError> {
        let key = key.into();

        if let Some(current) = self.locked.get(&key) {
            if *current != value {
                return Err(ImmutableParameterError::new(&key, current.clone(), value));
            }
        } else if lock {
            self.locked.insert(key.clone(), value.clone());
        }

        self.explicit.insert(key, value);
        Ok(())
    }

    /// Removes an explicit value, returning it.
    pub fn unset(&mut self, key: &str) -> Option<serde_json::Value> {
        self.explicit.shift_remove(key)
    }

    /// Records lock values carried over from another bag.
    ///
    /// Existing lock records win; seeding never changes a lock.
    pub fn seed_locks(&mut self, locks: &ParamMap) {
        for (key, value) in locks {
            self.locked
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Returns the explicitly set parameters in insertion order.
    #[must_use]
    pub fn explicit(&self) -> &ParamMap {
        &self.explicit
    }

    /// Returns the lock records in insertion order.
    #[must_use]
    pub fn locked(&self) -> &ParamMap {
        &self.locked
    }

    /// Returns the number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.explicit.len()
    }

    /// Returns true if nothing was explicitly set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
    }
}
