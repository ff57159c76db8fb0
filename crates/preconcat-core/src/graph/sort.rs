//! Build ordering (Kahn's algorithm).
//!
//! The sort works on an owned copy of every node's outstanding
//! dependencies; the graph itself is never touched. When the ready queue
//! drains while nodes are still waiting, the remaining nodes sit on or
//! behind a cycle and [`DependencyGraph::detect_cycles`] is run to report
//! them all.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use super::{DependencyGraph, Node};
use crate::error::{CycleReport, GraphError};

impl DependencyGraph {
    /// Order every node after all of its dependencies.
    ///
    /// Ties are broken by graph order: the ready queue is FIFO, seeded in
    /// graph order, and newly freed nodes join it in graph order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CyclicDependencies`] listing every cycle if the
    /// graph is not a DAG.
    #[instrument(skip(self), fields(nodes = self.node_count()))]
    pub fn sort(&self) -> Result<Vec<&Node>, GraphError> {
        let mut outstanding: Vec<Vec<NodeIndex>> = self
            .graph
            .node_indices()
            .map(|idx| self.dependency_indices(idx))
            .collect();

        let mut ready: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| outstanding[idx.index()].is_empty())
            .collect();

        let mut sorted: Vec<&Node> = Vec::with_capacity(self.node_count());

        while let Some(idx) = ready.pop_front() {
            sorted.push(&self.graph[idx]);

            for dependent in self.dependents(idx) {
                let waiting = &mut outstanding[dependent.index()];
                if let Some(pos) = waiting.iter().position(|&dep| dep == idx) {
                    waiting.remove(pos);
                    if waiting.is_empty() {
                        ready.push_back(dependent);
                    }
                }
            }
        }

        if sorted.len() < self.node_count() {
            let cycles = self.detect_cycles();
            debug!(
                unordered = self.node_count() - sorted.len(),
                cycles = cycles.len(),
                "dependency cycles prevent ordering"
            );
            return Err(GraphError::CyclicDependencies(CycleReport { cycles }));
        }

        debug!(ordered = sorted.len(), "build order computed");
        Ok(sorted)
    }
}
