//! Cycle enumeration via Tarjan's strongly connected components.
//!
//! # Design
//!
//! - **Iterative**: the depth-first walk keeps its own frame stack, so a
//!   long `@require` chain cannot overflow the call stack.
//! - **Every cycle**: all SCCs with two or more members are reported, plus
//!   single files that require themselves.
//! - **Deterministic**: roots are tried in graph order and each node's
//!   dependencies in declaration order. Members are listed in the order
//!   they are popped off the Tarjan stack.

#![allow(clippy::module_name_repetitions)]

use petgraph::graph::NodeIndex;
use tracing::instrument;

use super::DependencyGraph;
use crate::error::Cycle;

/// Per-node Tarjan bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
struct Visit {
    index: Option<usize>,
    lowlink: usize,
    on_stack: bool,
}

impl DependencyGraph {
    /// Find every dependency cycle in the graph.
    ///
    /// Returns an empty list for a DAG. Does not fail: callers that need an
    /// error use [`sort`](Self::sort), which calls this on failure.
    ///
    /// Strongly connected components of two or more nodes are cycles. A
    /// single node is reported only when it requires itself, as `a -> a`;
    /// other single-node components are dropped.
    #[must_use]
    #[instrument(skip(self), fields(nodes = self.node_count()))]
    pub fn detect_cycles(&self) -> Vec<Cycle> {
        let adjacency: Vec<Vec<NodeIndex>> = self
            .graph
            .node_indices()
            .map(|idx| self.dependency_indices(idx))
            .collect();

        let mut visits = vec![Visit::default(); adjacency.len()];
        let mut next_index = 0usize;
        let mut stack: Vec<NodeIndex> = Vec::new();
        // Each frame: (node, position of the next dependency to visit).
        let mut frames: Vec<(NodeIndex, usize)> = Vec::new();
        let mut cycles: Vec<Cycle> = Vec::new();

        for root in self.graph.node_indices() {
            if visits[root.index()].index.is_some() {
                continue;
            }

            discover(root, &mut visits, &mut next_index, &mut stack);
            frames.push((root, 0));

            while let Some(frame) = frames.last_mut() {
                let node = frame.0;
                let next = adjacency[node.index()].get(frame.1).copied();
                frame.1 += 1;

                if let Some(dep) = next {
                    let dep_visit = visits[dep.index()];
                    match dep_visit.index {
                        None => {
                            discover(dep, &mut visits, &mut next_index, &mut stack);
                            frames.push((dep, 0));
                        }
                        Some(dep_index) if dep_visit.on_stack => {
                            let visit = &mut visits[node.index()];
                            visit.lowlink = visit.lowlink.min(dep_index);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                // All dependencies of `node` explored.
                frames.pop();
                let visit = visits[node.index()];

                if visit.index == Some(visit.lowlink) {
                    let mut members: Vec<String> = Vec::new();
                    let mut self_loop = false;
                    while let Some(member) = stack.pop() {
                        visits[member.index()].on_stack = false;
                        members.push(self.graph[member].id.clone());
                        if member == node {
                            self_loop = adjacency[node.index()].contains(&node);
                            break;
                        }
                    }
                    if members.len() > 1 || self_loop {
                        cycles.push(Cycle { members });
                    }
                }

                if let Some(&(parent, _)) = frames.last() {
                    let parent_visit = &mut visits[parent.index()];
                    parent_visit.lowlink = parent_visit.lowlink.min(visit.lowlink);
                }
            }
        }

        cycles
    }
}

fn discover(
    node: NodeIndex,
    visits: &mut [Visit],
    next_index: &mut usize,
    stack: &mut Vec<NodeIndex>,
) {
    visits[node.index()] = Visit {
        index: Some(*next_index),
        lowlink: *next_index,
        on_stack: true,
    };
    *next_index += 1;
    stack.push(node);
}
