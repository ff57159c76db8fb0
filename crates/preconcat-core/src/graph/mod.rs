//! File dependency graph, build ordering and cycle detection.
//!
//! # Overview
//!
//! Each source file becomes a [`Node`] keyed by its normalized identifier.
//! `@require` declarations become edges. The graph is validated once, at
//! construction, and is immutable afterwards.
//!
//! ## Pipeline
//!
//! ```text
//! [(path, content)]
//!        ↓  DependencyGraph::build()      normalize ids, extract @require, validate
//! DependencyGraph (every dependency resolves)
//!        ↓  DependencyGraph::sort()       Kahn's algorithm on a private copy
//! Vec<&Node> in build order
//!        ↘  on failure: detect_cycles()   Tarjan SCC, every cycle reported
//! ```
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "B requires A": A must be concatenated before B.
//! Declaring the same dependency twice yields a single edge.
//!
//! ## Determinism
//!
//! Nodes are iterated in index order, which is the order in which each
//! identifier was first seen. A node's dependencies are visited in
//! declaration order. Hash-map iteration never influences output.
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use preconcat_core::graph::{DependencyGraph, SourceFile};
//! use preconcat_core::ident::root_segments;
//!
//! let files = vec![SourceFile::new("src/a.js", "// @require b"), SourceFile::new("src/b.js", "")];
//! let graph = DependencyGraph::from_sources(&root_segments("src"), &files)?;
//! let order: Vec<&str> = graph.sort()?.iter().map(|n| n.file_path.as_str()).collect();
//! assert_eq!(order, ["src/b.js", "src/a.js"]);
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod build;
pub mod cycles;
pub mod export;
pub mod sort;

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

pub use build::{BuildOptions, DuplicateIdPolicy, SourceFile};
pub use export::{GraphSnapshot, order_fingerprint};

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One source file as a graph vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Identifier derived from the path; unique within a graph.
    pub id: String,
    /// Input path as given. Only used for output ordering.
    pub file_path: String,
    /// `@require` identifiers as declared, duplicates included.
    pub dependencies: Vec<String>,
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// A validated file dependency graph.
///
/// Every identifier listed in any node's `dependencies` resolves to a node.
/// [`sort`](Self::sort) and [`detect_cycles`](Self::detect_cycles) borrow
/// the graph immutably and can be called repeatedly.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Nodes are files; an edge `A → B` means B requires A.
    graph: DiGraph<Node, ()>,
    /// Identifier → node index.
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Number of files in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Look up a node by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.node_map.get(id).map(|&idx| &self.graph[idx])
    }

    /// Nodes in graph order (first-seen order of their identifiers).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Resolved dependencies of `idx` in declaration order, duplicates
    /// collapsed.
    fn dependency_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut resolved: Vec<NodeIndex> = Vec::new();
        for dep in &self.graph[idx].dependencies {
            if let Some(&dep_idx) = self.node_map.get(dep) {
                if !resolved.contains(&dep_idx) {
                    resolved.push(dep_idx);
                }
            }
        }
        resolved
    }

    /// Nodes that require `idx`, in graph order.
    fn dependents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut dependents: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        dependents.sort_unstable();
        dependents
    }
}
