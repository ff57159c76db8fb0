//! Read-only views of a graph: JSON snapshot, Graphviz DOT and the
//! fingerprint of a computed build order.

use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;
use serde::Serialize;

use super::{DependencyGraph, Node};

/// Serializable dump of a graph, nodes in graph order.
#[derive(Debug, Serialize)]
pub struct GraphSnapshot<'a> {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes: Vec<&'a Node>,
}

impl DependencyGraph {
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        GraphSnapshot {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            nodes: self.nodes().collect(),
        }
    }

    /// Graphviz rendering; an edge `a -> b` means `b` requires `a`.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let view: DiGraph<&str, &str> = self.graph.map(|_, node| node.id.as_str(), |_, _| "");
        Dot::with_config(&view, &[Config::EdgeNoLabel]).to_string()
    }
}

/// BLAKE3 digest of an ordered build list.
///
/// Two runs over the same inputs produce the same fingerprint; any change
/// to the order, an id or a path changes it.
#[must_use]
pub fn order_fingerprint(order: &[&Node]) -> String {
    let mut hasher = blake3::Hasher::new();
    for node in order {
        hasher.update(node.id.as_bytes());
        hasher.update(b"\x00");
        hasher.update(node.file_path.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}
