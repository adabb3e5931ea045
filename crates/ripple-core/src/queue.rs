//! Bounded FIFO event buffer.
//!
//! [`BoundedQueue`] is the queue-shaped event source: a fixed-capacity
//! FIFO where every operation is non-blocking. Producers `put`, the
//! dispatcher `take`s; when the queue is full, `put` evicts the oldest
//! element rather than blocking or failing.
//!
//! # Overwrite-Oldest Semantics
//!
//! ```text
//! capacity 3:   [a, b, c]  ── put(d) ──►  [b, c, d]
//!                 ▲                            ▲
//!               oldest (evicted)             newest
//! ```
//!
//! This makes the queue safe to feed from bursty producers: the buffer
//! never grows past its capacity and the most recent events win.
//!
//! # Why No Default?
//!
//! **Do not implement `Default` for `BoundedQueue`.** A queue requires an
//! explicit capacity; there is no sensible default.
//!
//! # Example
//!
//! ```
//! use ripple_core::BoundedQueue;
//!
//! let mut q = BoundedQueue::new(2);
//! q.put("hi");
//! q.put("there");
//! q.put("or-not"); // evicts "hi"
//!
//! assert_eq!(q.snapshot(), vec!["there", "or-not"]);
//! assert_eq!(q.take(), Some("there"));
//! ```

use std::collections::VecDeque;

/// Fixed-capacity FIFO with non-blocking take and
/// overwrite-oldest-on-full put.
///
/// # Invariants
///
/// - Length never exceeds capacity.
/// - `put` evicts exactly one element when and only when the queue is full.
/// - `take` and `put` never block.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue with the given capacity.
    ///
    /// A capacity of 0 is clamped to 1; a queue that can hold nothing
    /// has no meaningful behavior.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Removes and returns the oldest element, or `None` when empty.
    ///
    /// Never blocks, for any capacity.
    pub fn take(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    /// Appends a value, evicting the oldest element first if full.
    ///
    /// Never fails, never blocks, never exceeds capacity.
    pub fn put(&mut self, value: T) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    /// Returns the number of buffered elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no elements are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedQueue<T> {
    /// Returns all currently buffered elements in arrival order,
    /// leaving the queue unchanged.
    ///
    /// Implemented as a drain followed by a restore through [`put`],
    /// so the restore path reuses `put`'s eviction semantics.
    ///
    /// # Race
    ///
    /// If an external producer writes between the drain and the restore,
    /// elements can be reordered or lost to eviction. Snapshot a queue
    /// only while its lock is held or while no producer is active.
    ///
    /// [`put`]: Self::put
    pub fn snapshot(&mut self) -> Vec<T> {
        let mut drained = Vec::with_capacity(self.buf.len());
        while let Some(v) = self.take() {
            drained.push(v);
        }
        for v in &drained {
            self.put(v.clone());
        }
        drained
    }
}
