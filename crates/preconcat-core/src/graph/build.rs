//! Graph construction and validation from `(path, content)` pairs.
//!
//! Validation is eager: every unresolved `@require` across every file is
//! collected and reported in one [`GraphError::InvalidDependencies`] before
//! any ordering work begins.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{DependencyGraph, Node};
use crate::error::{
    DuplicateIds, GraphError, IdCollision, InvalidDependencies, MissingDependencies,
};
use crate::extract::extract_dependencies;
use crate::ident::normalize;

/// A file path and its already-loaded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// What to do when two files normalize to the same identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateIdPolicy {
    /// The later file replaces the earlier one (a warning is logged).
    #[default]
    Overwrite,
    /// Fail with [`GraphError::DuplicateIds`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub duplicate_ids: DuplicateIdPolicy,
}

impl DependencyGraph {
    /// Build with [`BuildOptions::default`].
    ///
    /// # Errors
    ///
    /// See [`DependencyGraph::build`].
    pub fn from_sources<S: AsRef<str>>(
        root_segments: &[S],
        files: &[SourceFile],
    ) -> Result<Self, GraphError> {
        Self::build(root_segments, files, BuildOptions::default())
    }

    /// Index `files` by identifier and validate every declared dependency.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateIds`] if `options` rejects identifier
    ///   collisions and at least one occurred.
    /// - [`GraphError::InvalidDependencies`] if any `@require` names an
    ///   identifier with no file, listing every offending node.
    #[instrument(skip(root_segments, files), fields(files = files.len()))]
    pub fn build<S: AsRef<str>>(
        root_segments: &[S],
        files: &[SourceFile],
        options: BuildOptions,
    ) -> Result<Self, GraphError> {
        let mut graph = DiGraph::<Node, ()>::with_capacity(files.len(), files.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(files.len());
        let mut collisions: Vec<IdCollision> = Vec::new();

        for file in files {
            let id = normalize(root_segments, &file.path);
            let dependencies = extract_dependencies(&file.content);
            debug!(
                id = %id,
                path = %file.path,
                requires = dependencies.len(),
                "indexed source file"
            );

            let node = Node {
                id: id.clone(),
                file_path: file.path.clone(),
                dependencies,
            };

            match node_map.entry(id) {
                Entry::Vacant(slot) => {
                    slot.insert(graph.add_node(node));
                }
                Entry::Occupied(slot) => {
                    let idx = *slot.get();
                    let previous_path = graph[idx].file_path.clone();
                    match options.duplicate_ids {
                        DuplicateIdPolicy::Overwrite => {
                            warn!(
                                id = %node.id,
                                replaced = %previous_path,
                                by = %node.file_path,
                                "duplicate identifier, keeping the later file"
                            );
                            graph[idx] = node;
                        }
                        DuplicateIdPolicy::Reject => collisions.push(IdCollision {
                            id: node.id,
                            first_path: previous_path,
                            second_path: node.file_path,
                        }),
                    }
                }
            }
        }

        if !collisions.is_empty() {
            return Err(GraphError::DuplicateIds(DuplicateIds { collisions }));
        }

        verify(&graph, &node_map)?;

        let edges: Vec<(NodeIndex, NodeIndex)> = graph
            .node_indices()
            .flat_map(|idx| {
                graph[idx]
                    .dependencies
                    .iter()
                    .filter_map(|dep| node_map.get(dep).map(|&dep_idx| (dep_idx, idx)))
                    .collect::<Vec<_>>()
            })
            .collect();

        for (dependency, dependent) in edges {
            // Repeated declarations collapse to one edge.
            if !graph.contains_edge(dependency, dependent) {
                graph.add_edge(dependency, dependent, ());
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "dependency graph built"
        );

        Ok(Self { graph, node_map })
    }
}

/// Check that every declared dependency resolves to a node.
fn verify(
    graph: &DiGraph<Node, ()>,
    node_map: &HashMap<String, NodeIndex>,
) -> Result<(), GraphError> {
    let nodes: Vec<MissingDependencies> = graph
        .node_weights()
        .filter_map(|node| {
            let missing: Vec<String> = node
                .dependencies
                .iter()
                .filter(|dep| !node_map.contains_key(dep.as_str()))
                .cloned()
                .collect();
            (!missing.is_empty()).then(|| MissingDependencies {
                id: node.id.clone(),
                missing,
            })
        })
        .collect();

    if nodes.is_empty() {
        Ok(())
    } else {
        Err(GraphError::InvalidDependencies(InvalidDependencies { nodes }))
    }
}
