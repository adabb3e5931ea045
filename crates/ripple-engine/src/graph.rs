//! Dependency graph wiring.
//!
//! A [`DependencyGraph`] is plain data: an ordered list of edges from an
//! [`EventSource`] to its subscribers. There is no registration API -
//! the embedding application builds the graph directly and hands it to
//! [`PropagationEngine::propagate`](crate::PropagationEngine::propagate).
//!
//! Edge order is the iteration order of a propagation pass; subscriber
//! order within an edge is the delivery order. Duplicate subscribers are
//! permitted (each receives the value once per occurrence). Sources are
//! keyed by identity: the same shared queue wired into two edges counts
//! once in the freshness scan.

use ripple_core::{EventSource, Subscriber};

/// One source and its ordered subscriber list.
pub type Edge = (EventSource, Vec<Subscriber>);

/// Mapping from event sources to ordered subscriber lists.
///
/// # Example
///
/// ```
/// use ripple_core::{shared_queue, EventSource, Subscriber};
/// use ripple_engine::DependencyGraph;
///
/// let queue = shared_queue(8);
/// let out = shared_queue(8);
///
/// let graph = DependencyGraph::new()
///     .edge(EventSource::queue(queue), vec![Subscriber::sink(out)]);
/// assert_eq!(graph.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge, builder style.
    #[must_use]
    pub fn edge(mut self, source: EventSource, subscribers: Vec<Subscriber>) -> Self {
        self.add_edge(source, subscribers);
        self
    }

    /// Adds an edge.
    pub fn add_edge(&mut self, source: EventSource, subscribers: Vec<Subscriber>) {
        self.edges.push((source, subscribers));
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the edges in iteration order, subscribers mutable for
    /// delivery.
    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    /// Returns every distinct source in the graph, deduplicated by
    /// identity, in first-appearance order.
    #[must_use]
    pub fn distinct_sources(&self) -> Vec<EventSource> {
        let mut distinct: Vec<EventSource> = Vec::new();
        for (source, _) in &self.edges {
            if !distinct.iter().any(|known| known.same_source(source)) {
                distinct.push(source.clone());
            }
        }
        distinct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::{shared_queue, shared_record};

    #[test]
    fn distinct_sources_dedups_by_identity() {
        let queue = shared_queue(2);
        let record = shared_record();

        let graph = DependencyGraph::new()
            .edge(EventSource::queue(queue.clone()), vec![])
            .edge(EventSource::record(record), vec![])
            .edge(EventSource::queue(queue), vec![]);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.distinct_sources().len(), 2);
    }

    #[test]
    fn equal_but_distinct_sources_stay_distinct() {
        let graph = DependencyGraph::new()
            .edge(EventSource::queue(shared_queue(2)), vec![])
            .edge(EventSource::queue(shared_queue(2)), vec![]);

        assert_eq!(graph.distinct_sources().len(), 2);
    }

    #[test]
    fn duplicate_subscribers_permitted() {
        let out = shared_queue(4);
        let graph = DependencyGraph::new().edge(
            EventSource::queue(shared_queue(2)),
            vec![Subscriber::sink(out.clone()), Subscriber::sink(out)],
        );

        let (_, subscribers) = &graph.edges[0];
        assert_eq!(subscribers.len(), 2);
    }
}
