//! Dispatcher - pulls one source and fans values out to subscribers.
//!
//! The [`Dispatcher`] is the delivery site of the engine. Given one
//! [`EventSource`] and its ordered subscriber list, [`pull`] extracts the
//! next fresh value and delivers it to every subscriber in list order;
//! [`pull_all`] repeats until the source is drained.
//!
//! ```text
//! ┌─────────────┐  take_if_fresh  ┌─────────────┐
//! │ EventSource │ ──────────────► │  Dispatcher │
//! └─────────────┘      value      └─────────────┘
//!                                   │    │    │   fan-out, list order
//!                                   ▼    ▼    ▼
//!                                 [sub] [sub] [sub]
//!                                         │
//!                                         │ Err(DeliveryError)
//!                                         ▼
//!                                   FailureSink      (isolated)
//! ```
//!
//! # Failure Isolation
//!
//! Each delivery runs inside its own failure boundary. An error from one
//! subscriber is packaged into a [`FailureReport`] and handed to the sink;
//! the remaining subscribers still receive the value and nothing
//! propagates to the caller. Report all, abort none. The failing delivery
//! is not retried - at-most-once per registered edge.
//!
//! The only errors `pull` returns are the fatal configuration errors
//! ([`EngineError::UnsupportedSource`] /
//! [`EngineError::UnsupportedSubscriber`]): those signal a wiring bug and
//! are never isolated.
//!
//! [`pull`]: Dispatcher::pull
//! [`pull_all`]: Dispatcher::pull_all

use crate::error::EngineError;
use crate::sink::LogSink;
use ripple_core::{DeliveryError, EventSource, FailureReport, FailureSink, Subscriber};
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// Drains event sources and fans values out to subscribers,
/// isolating per-subscriber failures.
pub struct Dispatcher {
    sink: Arc<dyn FailureSink>,
}

impl Dispatcher {
    /// Creates a dispatcher reporting failures through [`LogSink`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(LogSink))
    }

    /// Creates a dispatcher reporting failures through the given sink.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn FailureSink>) -> Self {
        Self { sink }
    }

    /// Returns whether the source currently holds undelivered data,
    /// without consuming anything.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnsupportedSource`] for a source variant outside
    /// the supported set.
    pub fn is_fresh(&self, source: &EventSource) -> Result<bool, EngineError> {
        match source {
            EventSource::Queue(queue) => Ok(!queue.lock().is_empty()),
            EventSource::Record(record) => Ok(record.lock().is_fresh()),
            other => Err(EngineError::UnsupportedSource(other.kind().to_string())),
        }
    }

    /// Extracts the next fresh value from the source, consuming its
    /// freshness; `None` when the source has nothing new.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnsupportedSource`] for a source variant outside
    /// the supported set.
    pub fn take_if_fresh(&self, source: &EventSource) -> Result<Option<Value>, EngineError> {
        match source {
            EventSource::Queue(queue) => Ok(queue.lock().take()),
            EventSource::Record(record) => Ok(record.lock().take_if_fresh()),
            other => Err(EngineError::UnsupportedSource(other.kind().to_string())),
        }
    }

    /// Extracts one value and fans it out to every subscriber in list
    /// order.
    ///
    /// Returns the extracted value so the caller can tell whether a
    /// delivery round occurred, or `None` when the source was not fresh
    /// (in which case no subscriber is invoked).
    ///
    /// Subscriber failures are reported to the sink and do not abort the
    /// round; see the module docs.
    ///
    /// # Errors
    ///
    /// Only the fatal configuration errors; never a delivery failure.
    pub fn pull(
        &self,
        source: &EventSource,
        subscribers: &mut [Subscriber],
    ) -> Result<Option<Value>, EngineError> {
        let Some(value) = self.take_if_fresh(source)? else {
            return Ok(None);
        };
        trace!(source = source.kind(), fanout = subscribers.len(), "pull");

        for subscriber in subscribers.iter_mut() {
            self.deliver(subscriber, &value)?;
        }
        Ok(Some(value))
    }

    /// Calls [`pull`](Self::pull) until the source is drained, delivering
    /// every buffered event oldest-first. Returns the number of events
    /// delivered.
    ///
    /// # Errors
    ///
    /// Only the fatal configuration errors; never a delivery failure.
    pub fn pull_all(
        &self,
        source: &EventSource,
        subscribers: &mut [Subscriber],
    ) -> Result<usize, EngineError> {
        let mut drained = 0;
        while self.pull(source, subscribers)?.is_some() {
            drained += 1;
        }
        Ok(drained)
    }

    /// Delivers one value to one subscriber inside its failure boundary.
    fn deliver(&self, subscriber: &mut Subscriber, value: &Value) -> Result<(), EngineError> {
        let outcome = match subscriber {
            Subscriber::Callback(callback) => callback(value),
            Subscriber::Sink(queue) => {
                queue.lock().put(value.clone());
                Ok(())
            }
            Subscriber::Handler(handler) => handler.on_event(value),
            other => return Err(EngineError::UnsupportedSubscriber(other.label())),
        };

        if let Err(err) = outcome {
            let report = match err {
                // Already a well-formed report: forward unwrapped.
                DeliveryError::Report(report) => *report,
                err => FailureReport::new(err, value.clone(), subscriber.label()),
            };
            self.sink.report(&report);
        }
        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CapturingSink, FailingHandler, RecordingHandler};
    use ripple_core::{shared_queue, shared_record};
    use serde_json::json;

    #[test]
    fn pull_on_empty_source_delivers_nothing() {
        let dispatcher = Dispatcher::new();
        let source = EventSource::queue(shared_queue(4));
        let (handler, seen) = RecordingHandler::new("rec");
        let mut subscribers = vec![Subscriber::handler(handler)];

        let pulled = dispatcher
            .pull(&source, &mut subscribers)
            .expect("queue source is supported");

        assert!(pulled.is_none());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn pull_fans_out_in_list_order() {
        let dispatcher = Dispatcher::new();
        let queue = shared_queue(4);
        queue.lock().put(json!("ev"));
        let source = EventSource::queue(queue);

        let order = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let first = order.clone();
        let second = order.clone();
        let mut subscribers = vec![
            Subscriber::callback(move |_| {
                first.lock().push("first");
                Ok(())
            }),
            Subscriber::callback(move |_| {
                second.lock().push("second");
                Ok(())
            }),
        ];

        let pulled = dispatcher
            .pull(&source, &mut subscribers)
            .expect("queue source is supported");

        assert_eq!(pulled, Some(json!("ev")));
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn failure_does_not_abort_fan_out() {
        let sink = CapturingSink::new();
        let dispatcher = Dispatcher::with_sink(sink.clone());

        let queue = shared_queue(4);
        queue.lock().put(json!(7));
        let source = EventSource::queue(queue);

        let (tail, seen) = RecordingHandler::new("tail");
        let mut subscribers = vec![
            Subscriber::handler(FailingHandler::new("broken")),
            Subscriber::handler(tail),
        ];

        dispatcher
            .pull(&source, &mut subscribers)
            .expect("delivery failures must not propagate");

        assert_eq!(*seen.lock(), vec![json!(7)]);
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].subscriber, "broken");
        assert_eq!(reports[0].value, json!(7));
    }

    #[test]
    fn preshaped_report_forwarded_unwrapped() {
        let sink = CapturingSink::new();
        let dispatcher = Dispatcher::with_sink(sink.clone());

        let queue = shared_queue(1);
        queue.lock().put(json!("v"));
        let source = EventSource::queue(queue);

        let mut subscribers = vec![Subscriber::callback(|value| {
            Err(DeliveryError::Report(Box::new(FailureReport::new(
                DeliveryError::failed("inner cause"),
                value.clone(),
                "pre-shaped",
            ))))
        })];

        dispatcher
            .pull(&source, &mut subscribers)
            .expect("delivery failures must not propagate");

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        // The inner report survives as-is; no wrapping layer around it.
        assert_eq!(reports[0].subscriber, "pre-shaped");
        assert!(matches!(reports[0].error, DeliveryError::Failed(_)));
    }

    #[test]
    fn pull_all_drains_oldest_first() {
        let dispatcher = Dispatcher::new();
        let queue = shared_queue(8);
        for i in 0..3 {
            queue.lock().put(json!(i));
        }
        let source = EventSource::queue(queue.clone());

        let out = shared_queue(8);
        let mut subscribers = vec![Subscriber::sink(out.clone())];

        let drained = dispatcher
            .pull_all(&source, &mut subscribers)
            .expect("queue source is supported");

        assert_eq!(drained, 3);
        assert!(queue.lock().is_empty());
        assert_eq!(out.lock().snapshot(), vec![json!(0), json!(1), json!(2)]);
    }

    #[test]
    fn record_pull_consumes_freshness_once() {
        let dispatcher = Dispatcher::new();
        let record = shared_record();
        record.lock().write("a", json!(1));
        let source = EventSource::record(record);

        let out = shared_queue(4);
        let mut subscribers = vec![Subscriber::sink(out.clone())];

        let drained = dispatcher
            .pull_all(&source, &mut subscribers)
            .expect("record source is supported");

        assert_eq!(drained, 1);
        assert_eq!(out.lock().snapshot(), vec![json!({"a": 1})]);
        assert!(!dispatcher.is_fresh(&source).expect("record source"));
    }
}
