//! Change-tracked mutable record.
//!
//! [`ChangeTrackedRecord`] is the record-shaped event source: a string-keyed
//! JSON mapping carrying a dirty flag. The sanctioned mutation operations
//! ([`write`] and [`update`]) set the flag; the dispatcher consumes it via
//! [`take_if_fresh`], which yields the full current mapping as the event
//! payload.
//!
//! # Dirty-Flag Contract
//!
//! The flag is `true` if and only if a sanctioned write occurred since the
//! last consuming read. Mutating the mapping through [`fields_mut`] bypasses
//! the flag entirely - that is a documented contract, not an enforced one.
//!
//! # Example
//!
//! ```
//! use ripple_core::ChangeTrackedRecord;
//! use serde_json::json;
//!
//! let mut record = ChangeTrackedRecord::new();
//! record.write("a", json!(1));
//! assert!(record.is_fresh());
//!
//! let payload = record.take_if_fresh().expect("fresh after write");
//! assert_eq!(payload, json!({"a": 1}));
//! assert!(!record.is_fresh());
//! assert!(record.take_if_fresh().is_none());
//! ```
//!
//! [`write`]: ChangeTrackedRecord::write
//! [`update`]: ChangeTrackedRecord::update
//! [`take_if_fresh`]: ChangeTrackedRecord::take_if_fresh
//! [`fields_mut`]: ChangeTrackedRecord::fields_mut

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A mutable key/value mapping with freshness tracking.
///
/// The event payload produced by a record is the *whole* current mapping
/// (as `Value::Object`), not a diff; subscribers see the record state at
/// extraction time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeTrackedRecord {
    fields: Map<String, Value>,
    dirty: bool,
}

impl ChangeTrackedRecord {
    /// Creates an empty record with the dirty flag cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from an initial mapping, dirty flag cleared.
    ///
    /// Initial contents are not "fresh" - nothing has changed yet.
    #[must_use]
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            dirty: false,
        }
    }

    /// Sets `key` to `value` and marks the record fresh.
    pub fn write(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
        self.dirty = true;
    }

    /// Replaces the value under `key` with `f(current)` and marks the
    /// record fresh.
    ///
    /// `f` receives `None` when the key is absent.
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_core::ChangeTrackedRecord;
    /// use serde_json::json;
    ///
    /// let mut record = ChangeTrackedRecord::new();
    /// record.write("count", json!(1));
    /// record.take_if_fresh();
    ///
    /// record.update("count", |old| {
    ///     json!(old.and_then(|v| v.as_i64()).unwrap_or(0) + 1)
    /// });
    ///
    /// assert!(record.is_fresh());
    /// assert_eq!(record.get("count"), Some(&json!(2)));
    /// ```
    pub fn update<F>(&mut self, key: impl Into<String>, f: F)
    where
        F: FnOnce(Option<&Value>) -> Value,
    {
        let key = key.into();
        let next = f(self.fields.get(&key));
        self.fields.insert(key, next);
        self.dirty = true;
    }

    /// Returns the dirty flag without side effects.
    ///
    /// Freshness scans use this; only the dispatcher consumes freshness
    /// via [`take_if_fresh`](Self::take_if_fresh).
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.dirty
    }

    /// If fresh: clears the flag and returns the full current mapping as
    /// the event payload. Otherwise returns `None`.
    pub fn take_if_fresh(&mut self) -> Option<Value> {
        if self.dirty {
            self.dirty = false;
            Some(Value::Object(self.fields.clone()))
        } else {
            None
        }
    }

    /// Returns the value under `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the current mapping.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns the mapping for direct mutation.
    ///
    /// **Bypasses freshness tracking.** Changes made through this
    /// reference do not set the dirty flag and will not propagate until
    /// a sanctioned write occurs.
    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    /// Returns the number of keys in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
