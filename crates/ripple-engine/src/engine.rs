//! PropagationEngine - fixed-point dispatch over a dependency graph.
//!
//! [`propagate`] repeatedly runs the dispatcher over every edge of a
//! [`DependencyGraph`] until a full freshness scan finds nothing new
//! anywhere, then runs an optional finalization set exactly once.
//!
//! ```text
//!        ┌──────────────────────────────────────────┐
//!        │  scan: any distinct source fresh?        │◄────┐
//!        └──────────────────────────────────────────┘     │
//!                │ yes                      │ no          │
//!                ▼                          ▼             │
//!        ┌───────────────┐          ┌──────────────┐      │
//!        │ full pass:    │          │ finalize set │      │
//!        │ pull_all over │ ─────────│ (once, no    │      │
//!        │ EVERY edge    │    │     │  loop)       │      │
//!        └───────────────┘    │     └──────────────┘      │
//!                             └────────────────────────── ┘
//! ```
//!
//! # Why a Full Pass?
//!
//! A delivery on one edge may write into a record or queue that is itself
//! a source elsewhere in the same graph. Every pass therefore visits every
//! edge - no short-circuit on the first fresh source - and the loop only
//! stops when a whole scan comes back quiet. That is the fixed point.
//!
//! # Termination
//!
//! Termination is a liveness property of the caller's wiring, not
//! something the engine enforces: a subscriber that always re-marks a
//! graph source as fresh keeps `propagate` looping forever. Callers that
//! need bounded execution opt in with
//! [`with_pass_limit`](PropagationEngine::with_pass_limit).
//!
//! The pass limit bounds *cross-edge* feedback loops. A subscriber that
//! re-marks its own edge's source fresh on every delivery loops inside
//! that edge's `pull_all`, below the pass counter - that wiring never
//! terminates, limit or not.
//!
//! [`propagate`]: PropagationEngine::propagate

use crate::dispatch::Dispatcher;
use crate::error::EngineError;
use crate::graph::DependencyGraph;
use ripple_core::FailureSink;
use std::sync::Arc;
use tracing::debug;

/// Summary of one `propagate` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Number of full passes over the graph before quiescence.
    pub passes: usize,
    /// Number of events delivered (drain rounds), finalize included.
    pub events: usize,
}

/// Drives a dependency graph to its fixed point.
///
/// # Example
///
/// ```
/// use ripple_core::{shared_queue, EventSource, Subscriber};
/// use ripple_engine::{DependencyGraph, PropagationEngine};
/// use serde_json::json;
///
/// let input = shared_queue(8);
/// input.lock().put(json!("hello"));
/// let output = shared_queue(8);
///
/// let mut graph = DependencyGraph::new().edge(
///     EventSource::queue(input),
///     vec![Subscriber::sink(output.clone())],
/// );
///
/// let report = PropagationEngine::new()
///     .propagate(&mut graph)
///     .expect("graph wiring is valid");
///
/// assert_eq!(report.events, 1);
/// assert_eq!(output.lock().take(), Some(json!("hello")));
/// ```
pub struct PropagationEngine {
    dispatcher: Dispatcher,
    pass_limit: Option<usize>,
}

impl PropagationEngine {
    /// Creates an engine with the default logging failure sink and no
    /// pass limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            pass_limit: None,
        }
    }

    /// Creates an engine reporting delivery failures through the given
    /// sink.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn FailureSink>) -> Self {
        Self {
            dispatcher: Dispatcher::with_sink(sink),
            pass_limit: None,
        }
    }

    /// Bounds the number of full passes, builder style.
    ///
    /// By default propagation loops until quiescent, which never returns
    /// on a self-sustaining graph. With a limit, exceeding it fails with
    /// [`EngineError::PassLimitExceeded`].
    #[must_use]
    pub fn with_pass_limit(mut self, limit: usize) -> Self {
        self.pass_limit = Some(limit);
        self
    }

    /// Propagates until the graph is quiescent.
    ///
    /// # Errors
    ///
    /// Fatal configuration errors and the opt-in pass limit; delivery
    /// failures are isolated and reported, never returned.
    pub fn propagate(
        &self,
        graph: &mut DependencyGraph,
    ) -> Result<PropagationReport, EngineError> {
        let mut finalize = DependencyGraph::new();
        self.propagate_with_finalize(graph, &mut finalize)
    }

    /// Propagates until the graph is quiescent, then runs every finalize
    /// edge through `pull_all` exactly once, unconditionally, without
    /// looping.
    ///
    /// # Errors
    ///
    /// Fatal configuration errors and the opt-in pass limit; delivery
    /// failures are isolated and reported, never returned.
    pub fn propagate_with_finalize(
        &self,
        graph: &mut DependencyGraph,
        finalize: &mut DependencyGraph,
    ) -> Result<PropagationReport, EngineError> {
        let mut report = PropagationReport::default();

        while self.any_fresh(graph)? {
            if let Some(limit) = self.pass_limit {
                if report.passes == limit {
                    return Err(EngineError::PassLimitExceeded {
                        passes: report.passes,
                    });
                }
            }
            report.passes += 1;

            // Full pass over ALL edges: side effects from one edge may
            // re-trigger freshness in a later edge within this same pass.
            for (source, subscribers) in graph.edges_mut() {
                report.events += self.dispatcher.pull_all(source, subscribers)?;
            }
            debug!(pass = report.passes, events = report.events, "propagation pass");
        }
        debug!(
            passes = report.passes,
            events = report.events,
            "graph quiescent"
        );

        for (source, subscribers) in finalize.edges_mut() {
            report.events += self.dispatcher.pull_all(source, subscribers)?;
        }

        Ok(report)
    }

    /// Scans freshness across every distinct source in the graph.
    fn any_fresh(&self, graph: &DependencyGraph) -> Result<bool, EngineError> {
        for source in graph.distinct_sources() {
            if self.dispatcher.is_fresh(&source)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for PropagationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::{shared_queue, shared_record, EventSource, Subscriber};
    use serde_json::json;

    #[test]
    fn empty_graph_is_immediately_quiescent() {
        let mut graph = DependencyGraph::new();
        let report = PropagationEngine::new()
            .propagate(&mut graph)
            .expect("empty graph is valid");

        assert_eq!(report, PropagationReport::default());
    }

    #[test]
    fn drains_buffered_events_in_one_pass() {
        let input = shared_queue(8);
        for i in 0..4 {
            input.lock().put(json!(i));
        }
        let output = shared_queue(8);

        let mut graph = DependencyGraph::new().edge(
            EventSource::queue(input.clone()),
            vec![Subscriber::sink(output.clone())],
        );

        let report = PropagationEngine::new()
            .propagate(&mut graph)
            .expect("graph wiring is valid");

        assert_eq!(report.passes, 1);
        assert_eq!(report.events, 4);
        assert!(input.lock().is_empty());
        assert_eq!(output.lock().len(), 4);
    }

    #[test]
    fn finalize_runs_exactly_once_after_quiescence() {
        let input = shared_queue(4);
        input.lock().put(json!("main"));
        let main_out = shared_queue(4);

        let final_queue = shared_queue(4);
        final_queue.lock().put(json!("tail"));
        let final_out = shared_queue(4);

        let mut graph = DependencyGraph::new().edge(
            EventSource::queue(input),
            vec![Subscriber::sink(main_out.clone())],
        );
        let mut finalize = DependencyGraph::new().edge(
            EventSource::queue(final_queue),
            vec![Subscriber::sink(final_out.clone())],
        );

        let report = PropagationEngine::new()
            .propagate_with_finalize(&mut graph, &mut finalize)
            .expect("graph wiring is valid");

        assert_eq!(report.events, 2);
        assert_eq!(main_out.lock().take(), Some(json!("main")));
        assert_eq!(final_out.lock().take(), Some(json!("tail")));
        assert_eq!(final_out.lock().take(), None);
    }

    #[test]
    fn finalize_edges_run_even_when_never_fresh() {
        // An empty finalize source still gets its pull_all round; it just
        // delivers nothing.
        let mut graph = DependencyGraph::new();
        let mut finalize = DependencyGraph::new().edge(
            EventSource::queue(shared_queue(2)),
            vec![Subscriber::sink(shared_queue(2))],
        );

        let report = PropagationEngine::new()
            .propagate_with_finalize(&mut graph, &mut finalize)
            .expect("graph wiring is valid");

        assert_eq!(report.events, 0);
    }

    #[test]
    fn pass_limit_trips_on_self_sustaining_graph() {
        // Two edges feeding each other: every pass re-marks the other
        // source, so the graph never goes quiescent.
        let ping = shared_record();
        ping.lock().write("n", json!(0));
        let pong = shared_record();
        let to_pong = pong.clone();
        let to_ping = ping.clone();

        let mut graph = DependencyGraph::new()
            .edge(
                EventSource::record(ping.clone()),
                vec![Subscriber::callback(move |_| {
                    to_pong.lock().write("n", json!("ping"));
                    Ok(())
                })],
            )
            .edge(
                EventSource::record(pong),
                vec![Subscriber::callback(move |_| {
                    to_ping.lock().write("n", json!("pong"));
                    Ok(())
                })],
            );

        let err = PropagationEngine::new()
            .with_pass_limit(5)
            .propagate(&mut graph)
            .expect_err("self-sustaining graph must trip the limit");

        assert!(matches!(err, EngineError::PassLimitExceeded { passes: 5 }));
    }
}
