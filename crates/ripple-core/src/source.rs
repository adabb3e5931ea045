//! Event source sum type.
//!
//! [`EventSource`] closes the set of things the engine can pull from:
//! a [`BoundedQueue`] of values or a [`ChangeTrackedRecord`]. Sources are
//! shared behind `Arc<Mutex<_>>` so external producers can write while the
//! engine consumes, and so the same source can appear in several graphs.
//!
//! Identity, not equality, keys a source in a dependency graph:
//! two `EventSource` values are the same source when they point at the
//! same allocation ([`same_source`]).
//!
//! The enum is `#[non_exhaustive]`; downstream matches must carry a
//! wildcard arm, which is where the engine raises its fatal
//! unsupported-source configuration error.
//!
//! [`same_source`]: EventSource::same_source

use crate::queue::BoundedQueue;
use crate::record::ChangeTrackedRecord;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// A shared queue of event payloads.
pub type SharedQueue = Arc<Mutex<BoundedQueue<Value>>>;

/// A shared change-tracked record.
pub type SharedRecord = Arc<Mutex<ChangeTrackedRecord>>;

/// Creates a shared queue with the given capacity.
#[must_use]
pub fn shared_queue(capacity: usize) -> SharedQueue {
    Arc::new(Mutex::new(BoundedQueue::new(capacity)))
}

/// Creates an empty shared record.
#[must_use]
pub fn shared_record() -> SharedRecord {
    Arc::new(Mutex::new(ChangeTrackedRecord::new()))
}

/// An event source the engine can check for freshness and drain.
///
/// # Freshness
///
/// | Variant | Fresh when | Extraction |
/// |---------|------------|------------|
/// | `Queue` | length > 0 | `take()` - oldest element |
/// | `Record` | dirty flag set | `take_if_fresh()` - full mapping |
///
/// Cloning an `EventSource` clones the handle, not the underlying
/// queue/record; clones are the [`same_source`](Self::same_source).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum EventSource {
    /// A bounded FIFO of event payloads.
    Queue(SharedQueue),
    /// A dirty-flagged mutable record.
    Record(SharedRecord),
}

impl EventSource {
    /// Wraps a shared queue as an event source.
    #[must_use]
    pub fn queue(queue: SharedQueue) -> Self {
        Self::Queue(queue)
    }

    /// Wraps a shared record as an event source.
    #[must_use]
    pub fn record(record: SharedRecord) -> Self {
        Self::Record(record)
    }

    /// Returns `true` when both handles point at the same underlying
    /// queue or record.
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_core::{shared_queue, EventSource};
    ///
    /// let q = shared_queue(4);
    /// let a = EventSource::queue(q.clone());
    /// let b = a.clone();
    /// let c = EventSource::queue(shared_queue(4));
    ///
    /// assert!(a.same_source(&b));
    /// assert!(!a.same_source(&c));
    /// ```
    #[must_use]
    pub fn same_source(&self, other: &EventSource) -> bool {
        match (self, other) {
            (Self::Queue(a), Self::Queue(b)) => Arc::ptr_eq(a, b),
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Returns a short kind label for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Queue(_) => "queue",
            Self::Record(_) => "record",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_distinguishes_equal_contents() {
        let a = EventSource::queue(shared_queue(2));
        let b = EventSource::queue(shared_queue(2));

        assert!(a.same_source(&a));
        assert!(!a.same_source(&b));
    }

    #[test]
    fn clones_are_the_same_source() {
        let r = shared_record();
        let a = EventSource::record(r.clone());
        let b = a.clone();

        assert!(a.same_source(&b));

        // Writes through one handle are visible through the other.
        r.lock().write("k", json!(1));
        if let EventSource::Record(inner) = &b {
            assert!(inner.lock().is_fresh());
        } else {
            panic!("expected record source");
        }
    }

    #[test]
    fn queue_and_record_are_never_the_same() {
        let q = EventSource::queue(shared_queue(1));
        let r = EventSource::record(shared_record());
        assert!(!q.same_source(&r));
    }

    #[test]
    fn kind_labels() {
        assert_eq!(EventSource::queue(shared_queue(1)).kind(), "queue");
        assert_eq!(EventSource::record(shared_record()).kind(), "record");
    }
}
