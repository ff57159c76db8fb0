#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use preconcat_core::{DependencyGraph, GraphError, SourceFile};

// Input is split on NUL into file contents; file `i` lives at `src/f{i}.js`
// so any `@require f<n>` in the content can resolve.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let files: Vec<SourceFile> = text
        .split('\0')
        .take(64)
        .enumerate()
        .map(|(i, content)| SourceFile::new(format!("src/f{i}.js"), content))
        .collect();

    let Ok(graph) = DependencyGraph::from_sources(&["src"], &files) else {
        return;
    };

    match graph.sort() {
        Ok(order) => {
            assert_eq!(order.len(), graph.node_count());
            assert!(graph.detect_cycles().is_empty());
            let position: HashMap<&str, usize> = order
                .iter()
                .enumerate()
                .map(|(pos, node)| (node.id.as_str(), pos))
                .collect();
            for node in &order {
                for dep in &node.dependencies {
                    assert!(position[dep.as_str()] < position[node.id.as_str()]);
                }
            }
        }
        Err(GraphError::CyclicDependencies(report)) => {
            assert!(!report.cycles.is_empty());
            assert_eq!(report.cycles, graph.detect_cycles());
        }
        Err(other) => panic!("sort can only fail on cycles: {other}"),
    }
});
