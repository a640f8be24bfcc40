//! Builders for in-memory workspaces.

use blueprint::hir::{DependencyGraph, DependencyGraphResult, SymbolIndex};
use blueprint::parser::parse_blueprint;

/// Index every `(uri, text)` pair.
pub fn index_from(files: &[(&str, &str)]) -> SymbolIndex {
    let mut index = SymbolIndex::new();
    for (uri, text) in files {
        index.add_file(uri, &parse_blueprint(text));
    }
    index
}

/// Index the files and build the dependency graph.
pub fn graph_from(files: &[(&str, &str)]) -> DependencyGraphResult {
    DependencyGraph::build(&index_from(files))
}

/// Position of `path` in the topological order, panicking if absent.
pub fn position_of(graph: &DependencyGraphResult, path: &str) -> usize {
    graph
        .order_of(path)
        .unwrap_or_else(|| panic!("'{path}' missing from {:?}", graph.topological_order))
}

/// Assert every cycle is a closed walk over real edges.
pub fn assert_cycles_are_closed_walks(graph: &DependencyGraphResult) {
    for cycle in &graph.cycles {
        assert!(cycle.cycle.len() >= 3, "cycle too short: {:?}", cycle.cycle);
        assert_eq!(cycle.cycle.first(), cycle.cycle.last());
        assert_eq!(cycle.edges.len(), cycle.cycle.len() - 1);
        for pair in cycle.cycle.windows(2) {
            assert!(
                graph
                    .edges
                    .iter()
                    .any(|e| e.from == pair[0] && e.to == pair[1]),
                "{} -> {} is not an edge",
                pair[0],
                pair[1]
            );
        }
    }
}
