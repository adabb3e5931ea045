//! Fixed-point event-propagation engine.
//!
//! `ripple-engine` drives a bipartite dependency graph between event
//! sources (bounded queues, change-tracked records) and subscribers
//! (callbacks, sink queues, handler objects): every pending event is
//! delivered to every interested subscriber, repeatedly, until no source
//! in the graph reports new data. An optional finalization set then runs
//! exactly once.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PropagationEngine                       │
//! │   scan freshness ─► full pass over every edge ─► repeat      │
//! │   ┌────────────────────────────────────────────────────────┐ │
//! │   │                      Dispatcher                        │ │
//! │   │   take_if_fresh ─► fan out ─► isolate failures         │ │
//! │   └────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//!            │                                      │
//!            ▼                                      ▼
//!      EventSource                            FailureSink
//!   (queue / record)                    (default: tracing log)
//! ```
//!
//! # Execution Model
//!
//! Single-threaded, synchronous, non-blocking: `propagate` never
//! suspends and every primitive source operation is non-blocking, so the
//! engine is safe inside a cooperative scheduling context. Shared sources
//! take their own lock per operation; external producers may write
//! concurrently with the engine's consumption.
//!
//! # Failure Classes
//!
//! | Class | Example | Behavior |
//! |-------|---------|----------|
//! | Delivery failure | handler returns `Err` | isolated, reported to sink, fan-out continues |
//! | Configuration error | unsupported variant, pass limit | fatal, returned to the caller |
//!
//! # Example
//!
//! ```
//! use ripple_core::{shared_queue, shared_record, EventSource, Subscriber};
//! use ripple_engine::{DependencyGraph, PropagationEngine};
//! use serde_json::json;
//!
//! // A queue feeding a record, which feeds an output queue: the engine
//! // keeps passing until the chain settles.
//! let input = shared_queue(8);
//! input.lock().put(json!(10));
//!
//! let state = shared_record();
//! let state_writer = state.clone();
//! let output = shared_queue(8);
//!
//! let mut graph = DependencyGraph::new()
//!     .edge(
//!         EventSource::queue(input),
//!         vec![Subscriber::callback(move |value| {
//!             state_writer.lock().write("last", value.clone());
//!             Ok(())
//!         })],
//!     )
//!     .edge(
//!         EventSource::record(state),
//!         vec![Subscriber::sink(output.clone())],
//!     );
//!
//! let report = PropagationEngine::new()
//!     .propagate(&mut graph)
//!     .expect("graph wiring is valid");
//!
//! assert_eq!(report.events, 2);
//! assert_eq!(output.lock().take(), Some(json!({"last": 10})));
//! ```

mod dispatch;
mod engine;
mod error;
mod graph;
mod sink;

pub mod testing;

pub use dispatch::Dispatcher;
pub use engine::{PropagationEngine, PropagationReport};
pub use error::EngineError;
pub use graph::{DependencyGraph, Edge};
pub use sink::LogSink;

// Re-export from ripple_core for convenience
pub use ripple_core::{
    shared_queue, shared_record, BoundedQueue, ChangeTrackedRecord, DeliveryError, ErrorCode,
    EventHandler, EventSource, FailureReport, FailureSink, Subscriber,
};
