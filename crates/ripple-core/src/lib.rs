//! Core types for the ripple event-propagation engine.
//!
//! This crate provides the event sources, subscribers, and failure model
//! that `ripple-engine` drives to a fixed point.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Source Layer                           │
//! │  (value types, minimal dependencies)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ripple-core    : BoundedQueue, ChangeTrackedRecord,        │
//! │                   EventSource, Subscriber,        ◄── HERE  │
//! │                   DeliveryError, FailureSink, ErrorCode     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Engine Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ripple-engine  : Dispatcher, DependencyGraph,              │
//! │                   PropagationEngine                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Data Flow
//!
//! ```text
//! BoundedQueue / ChangeTrackedRecord     raw events
//!            │
//!            ▼
//!       EventSource                      freshness + extraction
//!            │
//!            ▼
//!   Dispatcher (ripple-engine)           fan one value out
//!            │
//!            ▼
//!       Subscriber                       callback / sink / handler
//! ```
//!
//! # Payloads
//!
//! Event payloads are [`serde_json::Value`] throughout. Queue sources
//! yield buffered values oldest-first; record sources yield their full
//! current mapping as `Value::Object`.
//!
//! # Example
//!
//! ```
//! use ripple_core::{shared_queue, shared_record, EventSource, Subscriber};
//! use serde_json::json;
//!
//! let queue = shared_queue(8);
//! queue.lock().put(json!("hello"));
//!
//! let record = shared_record();
//! record.lock().write("answer", json!(42));
//!
//! let sources = [EventSource::queue(queue), EventSource::record(record)];
//! let sink = Subscriber::sink(shared_queue(8));
//! assert_eq!(sources[0].kind(), "queue");
//! assert_eq!(sink.label(), "sink-queue");
//! ```

mod error;
mod queue;
mod record;
mod report;
mod source;
mod subscriber;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use queue::BoundedQueue;
pub use record::ChangeTrackedRecord;
pub use report::{DeliveryError, FailureReport, FailureSink};
pub use source::{shared_queue, shared_record, EventSource, SharedQueue, SharedRecord};
pub use subscriber::{CallbackFn, EventHandler, Subscriber};
