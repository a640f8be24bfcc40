//! Dependency graph over the symbol index.
//!
//! The graph is recomputed from scratch on every [`DependencyGraph::build`].
//! Paths are mapped to small integer ids (in lexicographic order, so id order
//! doubles as the tie-break order) and all algorithms run over integer
//! adjacency lists.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use super::index::SymbolIndex;
use super::symbols::{Reference, SymbolKind};

/// A directed ordering constraint: `from` depends on `to`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    pub from: Arc<str>,
    pub to: Arc<str>,
    /// The first reference that produced this edge
    pub reference: Reference,
    /// The document declaring the reference
    pub file: Arc<str>,
}

/// One closed walk through a strongly connected component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircularDependency {
    /// Paths of the walk; the first and last entries are equal
    pub cycle: Vec<Arc<str>>,
    /// Edges traversed, `cycle.len() - 1` of them
    pub edges: Vec<DependencyEdge>,
}

impl CircularDependency {
    pub fn contains(&self, path: &str) -> bool {
        self.cycle.iter().any(|p| p.as_ref() == path)
    }

    /// Render the walk as `a -> b -> a`.
    pub fn display(&self) -> String {
        self.cycle
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Result of building the dependency graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraphResult {
    pub edges: Vec<DependencyEdge>,
    pub cycles: Vec<CircularDependency>,
    /// Every symbol path, dependencies before dependents. Empty unless acyclic.
    pub topological_order: Vec<Arc<str>>,
    pub is_acyclic: bool,
}

impl DependencyGraphResult {
    /// Direct outgoing edges of `path`.
    pub fn dependencies(&self, path: &str) -> Vec<&DependencyEdge> {
        self.edges
            .iter()
            .filter(|e| e.from.as_ref() == path)
            .collect()
    }

    /// Direct incoming edges of `path`.
    pub fn dependents(&self, path: &str) -> Vec<&DependencyEdge> {
        self.edges
            .iter()
            .filter(|e| e.to.as_ref() == path)
            .collect()
    }

    /// Every path reachable from `path`, in breadth-first order.
    pub fn transitive_dependencies(&self, path: &str) -> Vec<Arc<str>> {
        let mut outgoing: FxHashMap<&str, Vec<&Arc<str>>> = FxHashMap::default();
        for edge in &self.edges {
            outgoing.entry(edge.from.as_ref()).or_default().push(&edge.to);
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        seen.insert(path);
        let mut queue: VecDeque<&str> = VecDeque::from([path]);
        let mut reached = Vec::new();
        while let Some(current) = queue.pop_front() {
            for &next in outgoing.get(current).into_iter().flatten() {
                if seen.insert(next.as_ref()) {
                    reached.push(next.clone());
                    queue.push_back(next.as_ref());
                }
            }
        }
        reached
    }

    pub fn cycles_containing(&self, path: &str) -> Vec<&CircularDependency> {
        self.cycles.iter().filter(|c| c.contains(path)).collect()
    }

    /// Position of `path` in the topological order, if acyclic.
    pub fn order_of(&self, path: &str) -> Option<usize> {
        self.topological_order
            .iter()
            .position(|p| p.as_ref() == path)
    }
}

/// Builder for [`DependencyGraphResult`].
pub struct DependencyGraph;

impl DependencyGraph {
    /// Build the dependency graph for the whole index.
    ///
    /// Unresolved references, self references and references declared in
    /// constraints produce no edge. The result is deterministic for a given
    /// index content.
    pub fn build(index: &SymbolIndex) -> DependencyGraphResult {
        let mut nodes: Vec<Arc<str>> = index.paths().cloned().collect();
        nodes.sort();
        let ids: FxHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(id, path)| (path.as_ref(), id))
            .collect();

        // 1-2. Candidate edges, deduplicated by (from, to)
        let mut edges = Vec::new();
        let mut edge_ids: FxHashMap<(usize, usize), usize> = FxHashMap::default();
        for symbol in index.all_symbols() {
            if symbol.kind == SymbolKind::Constraint {
                continue;
            }
            let Some(&from) = ids.get(symbol.path.as_ref()) else {
                continue;
            };
            for reference in &symbol.dependencies {
                let Some(target) = index.resolve_reference(reference).symbol else {
                    tracing::trace!(from = %symbol.path, to = %reference.path, "unresolved reference");
                    continue;
                };
                if target.path == symbol.path {
                    continue;
                }
                let Some(&to) = ids.get(target.path.as_ref()) else {
                    continue;
                };
                if edge_ids.contains_key(&(from, to)) {
                    continue;
                }
                edge_ids.insert((from, to), edges.len());
                edges.push(DependencyEdge {
                    from: symbol.path.clone(),
                    to: target.path.clone(),
                    reference: reference.clone(),
                    file: reference.file.clone(),
                });
            }
        }

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for &(from, to) in edge_ids.keys() {
            adjacency[from].push(to);
        }
        for successors in &mut adjacency {
            successors.sort_unstable();
        }

        // 3-4. Strongly connected components, one walk per component
        let components = Tarjan::new(&adjacency).run();
        let mut cycles: Vec<CircularDependency> = components
            .iter()
            .filter(|component| component.len() >= 2)
            .filter_map(|component| {
                let walk = closed_walk(&adjacency, component)?;
                let cycle = walk.iter().map(|&id| nodes[id].clone()).collect();
                let cycle_edges = walk
                    .windows(2)
                    .filter_map(|pair| edge_ids.get(&(pair[0], pair[1])))
                    .map(|&edge| edges[edge].clone())
                    .collect();
                Some(CircularDependency {
                    cycle,
                    edges: cycle_edges,
                })
            })
            .collect();
        cycles.sort_by(|a, b| a.cycle.cmp(&b.cycle));

        // 5. Topological order
        let is_acyclic = cycles.is_empty();
        let topological_order = if is_acyclic {
            kahn_order(&adjacency)
                .into_iter()
                .map(|id| nodes[id].clone())
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            cycles = cycles.len(),
            "built dependency graph"
        );

        DependencyGraphResult {
            edges,
            cycles,
            topological_order,
            is_acyclic,
        }
    }
}

/// Iterative Tarjan SCC over integer adjacency lists.
struct Tarjan<'a> {
    adjacency: &'a [Vec<usize>],
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl<'a> Tarjan<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<usize>> {
        for node in 0..self.adjacency.len() {
            if self.index[node].is_none() {
                self.visit(node);
            }
        }
        self.components
    }

    fn open(&mut self, node: usize) {
        self.index[node] = Some(self.next_index);
        self.lowlink[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    fn visit(&mut self, root: usize) {
        // (node, index of the next successor to explore)
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        self.open(root);

        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            if let Some(&next) = self.adjacency[node].get(frame.1) {
                frame.1 += 1;
                match self.index[next] {
                    None => {
                        self.open(next);
                        frames.push((next, 0));
                    }
                    Some(next_index) if self.on_stack[next] => {
                        self.lowlink[node] = self.lowlink[node].min(next_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[node]);
            }
            if self.index[node] == Some(self.lowlink[node]) {
                let mut component = Vec::new();
                while let Some(member) = self.stack.pop() {
                    self.on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                component.sort_unstable();
                self.components.push(component);
            }
        }
    }
}

/// Shortest closed walk from the smallest member of `component` back to
/// itself, staying inside the component.
fn closed_walk(adjacency: &[Vec<usize>], component: &[usize]) -> Option<Vec<usize>> {
    let members: FxHashSet<usize> = component.iter().copied().collect();
    let start = *component.iter().min()?;

    let mut parent: FxHashMap<usize, usize> = FxHashMap::default();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for &next in &adjacency[node] {
            if !members.contains(&next) {
                continue;
            }
            if next == start {
                let mut walk = vec![start, node];
                let mut current = node;
                while current != start {
                    current = *parent.get(&current)?;
                    walk.push(current);
                }
                walk.reverse();
                return Some(walk);
            }
            if !parent.contains_key(&next) {
                parent.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Kahn's algorithm emitting dependencies before dependents, smallest id first.
fn kahn_order(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let n = adjacency.len();
    let mut pending: Vec<usize> = adjacency.iter().map(|s| s.len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (from, successors) in adjacency.iter().enumerate() {
        for &to in successors {
            dependents[to].push(from);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&node| pending[node] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &dependent in &dependents[node] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }
    order
}
