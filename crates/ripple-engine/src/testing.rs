//! Testing support for graph wiring.
//!
//! Engine-independent helpers for exercising dispatch and propagation
//! without a real embedding application:
//!
//! - [`CapturingSink`] - collects [`FailureReport`]s instead of logging
//! - [`RecordingHandler`] - appends every delivered value to a shared list
//! - [`FailingHandler`] - fails every delivery, for isolation tests
//!
//! # Example
//!
//! ```
//! use ripple_core::{shared_queue, EventSource, Subscriber};
//! use ripple_engine::testing::{CapturingSink, FailingHandler, RecordingHandler};
//! use ripple_engine::{DependencyGraph, PropagationEngine};
//! use serde_json::json;
//!
//! let sink = CapturingSink::new();
//! let engine = PropagationEngine::with_sink(sink.clone());
//!
//! let input = shared_queue(4);
//! input.lock().put(json!(1));
//! let (recorder, seen) = RecordingHandler::new("recorder");
//!
//! let mut graph = DependencyGraph::new().edge(
//!     EventSource::queue(input),
//!     vec![
//!         Subscriber::handler(FailingHandler::new("flaky")),
//!         Subscriber::handler(recorder),
//!     ],
//! );
//!
//! engine.propagate(&mut graph).expect("wiring is valid");
//!
//! assert_eq!(*seen.lock(), vec![json!(1)]);
//! assert_eq!(sink.reports().len(), 1);
//! ```

use parking_lot::Mutex;
use ripple_core::{DeliveryError, EventHandler, FailureReport, FailureSink};
use serde_json::Value;
use std::sync::Arc;

/// Failure sink that captures reports for later assertions.
#[derive(Debug, Default)]
pub struct CapturingSink {
    reports: Mutex<Vec<FailureReport>>,
}

impl CapturingSink {
    /// Creates a shareable capturing sink.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns a copy of every report captured so far.
    #[must_use]
    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports.lock().clone()
    }

    /// Returns the number of captured reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

impl FailureSink for CapturingSink {
    fn report(&self, failure: &FailureReport) {
        self.reports.lock().push(failure.clone());
    }
}

/// Handler that records every delivered value.
pub struct RecordingHandler {
    id: String,
    seen: Arc<Mutex<Vec<Value>>>,
}

impl RecordingHandler {
    /// Creates a recording handler and the shared list it appends to.
    #[must_use]
    pub fn new(id: &str) -> (Self, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                id: id.to_string(),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

impl EventHandler for RecordingHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, value: &Value) -> Result<(), DeliveryError> {
        self.seen.lock().push(value.clone());
        Ok(())
    }
}

/// Handler that fails every delivery.
pub struct FailingHandler {
    id: String,
}

impl FailingHandler {
    /// Creates a handler that fails with its id in the reason.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

impl EventHandler for FailingHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, _value: &Value) -> Result<(), DeliveryError> {
        Err(DeliveryError::failed(format!(
            "{} always fails",
            self.id
        )))
    }
}
