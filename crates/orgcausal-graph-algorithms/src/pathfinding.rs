//! Pathfinding algorithms
//!
//! - `all_simple_paths`: depth-bounded enumeration of simple paths with multiplicative strength
//! - `strongest_path`: the single path with the highest strength product (Dijkstra over -ln w)

use super::common::{Direction, EdgeId, GraphView, NodeId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// A path through the graph with its combined strength
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedPath {
    /// Nodes from source to target, inclusive
    pub nodes: Vec<NodeId>,
    /// Edges taken, `nodes.len() - 1` of them
    pub edges: Vec<EdgeId>,
    /// Product of the edge weights
    pub strength: f64,
}

impl WeightedPath {
    /// Number of nodes on the path
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Paths always hold at least their source
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges on the path
    pub fn hops(&self) -> usize {
        self.edges.len()
    }
}

/// Limits for path enumeration
#[derive(Debug, Clone, Copy)]
pub struct PathSearch {
    /// Maximum number of edges on a path
    pub max_depth: usize,
    /// Edge orientation to follow
    pub direction: Direction,
    /// Stop after this many paths have been found
    pub max_paths: Option<usize>,
}

impl PathSearch {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            direction: Direction::Outgoing,
            max_paths: None,
        }
    }
}

/// Result of a path enumeration
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    /// Paths in discovery (depth-first) order
    pub paths: Vec<WeightedPath>,
    /// True when `max_paths` cut the enumeration short
    pub truncated: bool,
}

/// Enumerate every simple path from `source` to `target` with at most `search.max_depth` edges.
///
/// A node never repeats within one path; the on-path set is maintained per branch,
/// so a node blocked on one branch is available again after backtracking. Parallel
/// edges produce distinct paths. `source == target` yields no paths.
pub fn all_simple_paths(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    search: &PathSearch,
) -> PathSet {
    let mut result = PathSet::default();
    if source == target || search.max_depth == 0 {
        return result;
    }
    let (Some(source_idx), Some(target_idx)) = (view.index_of(source), view.index_of(target)) else {
        return result;
    };

    let mut walker = PathWalker {
        view,
        target_idx,
        search,
        on_path: vec![false; view.node_count],
        nodes: vec![source_idx],
        edges: Vec::new(),
        result: &mut result,
    };
    walker.on_path[source_idx] = true;
    walker.extend(source_idx, 1.0);

    result
}

struct PathWalker<'a> {
    view: &'a GraphView,
    target_idx: usize,
    search: &'a PathSearch,
    on_path: Vec<bool>,
    nodes: Vec<usize>,
    edges: Vec<EdgeId>,
    result: &'a mut PathSet,
}

impl PathWalker<'_> {
    /// Depth-first extension; returns false once the path cap is hit.
    fn extend(&mut self, current_idx: usize, strength: f64) -> bool {
        if self.edges.len() >= self.search.max_depth {
            return true;
        }

        let view = self.view;
        for next in view.adjacent(current_idx, self.search.direction) {
            if self.on_path[next.index] {
                continue;
            }
            let next_strength = strength * next.weight;

            if next.index == self.target_idx {
                if let Some(max) = self.search.max_paths {
                    if self.result.paths.len() >= max {
                        self.result.truncated = true;
                        return false;
                    }
                }
                let mut nodes: Vec<NodeId> =
                    self.nodes.iter().map(|&idx| view.index_to_node[idx]).collect();
                nodes.push(view.index_to_node[next.index]);
                let mut edges = self.edges.clone();
                edges.push(next.edge);
                self.result.paths.push(WeightedPath {
                    nodes,
                    edges,
                    strength: next_strength,
                });
                continue;
            }

            self.on_path[next.index] = true;
            self.nodes.push(next.index);
            self.edges.push(next.edge);

            let keep_going = self.extend(next.index, next_strength);

            self.edges.pop();
            self.nodes.pop();
            self.on_path[next.index] = false;

            if !keep_going {
                return false;
            }
        }
        true
    }
}

/// State for Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    hops: usize,
    node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap, fewer hops first on ties
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.hops.cmp(&self.hops))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

type StateKey = (usize, usize);

/// The simple path from `source` to `target` with the highest strength product,
/// using at most `max_depth` edges.
///
/// Weights are turned into additive costs `-ln(w)`; zero-weight edges are impassable.
/// Search states are `(node, hops)` so the depth bound is exact.
pub fn strongest_path(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    max_depth: usize,
    direction: Direction,
) -> Option<WeightedPath> {
    if source == target || max_depth == 0 {
        return None;
    }
    let source_idx = view.index_of(source)?;
    let target_idx = view.index_of(target)?;

    let mut dist: HashMap<StateKey, f64> = HashMap::new();
    let mut parent: HashMap<StateKey, (StateKey, EdgeId)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert((source_idx, 0), 0.0);
    heap.push(State { cost: 0.0, hops: 0, node_idx: source_idx });

    while let Some(State { cost, hops, node_idx }) = heap.pop() {
        let key = (node_idx, hops);
        if node_idx == target_idx {
            return Some(reconstruct(view, &parent, key, cost));
        }

        if cost > *dist.get(&key).unwrap_or(&f64::INFINITY) || hops >= max_depth {
            continue;
        }

        for next in view.adjacent(node_idx, direction) {
            if next.weight <= 0.0 || on_chain(&parent, key, next.index) {
                continue;
            }

            let next_key = (next.index, hops + 1);
            let next_cost = cost - next.weight.ln();

            if next_cost < *dist.get(&next_key).unwrap_or(&f64::INFINITY) {
                dist.insert(next_key, next_cost);
                parent.insert(next_key, (key, next.edge));
                heap.push(State { cost: next_cost, hops: hops + 1, node_idx: next.index });
            }
        }
    }

    None
}

/// Whether `idx` already appears on the parent chain ending at `key`
fn on_chain(parent: &HashMap<StateKey, (StateKey, EdgeId)>, key: StateKey, idx: usize) -> bool {
    let mut current = Some(key);
    while let Some(k) = current {
        if k.0 == idx {
            return true;
        }
        current = parent.get(&k).map(|(p, _)| *p);
    }
    false
}

fn reconstruct(
    view: &GraphView,
    parent: &HashMap<StateKey, (StateKey, EdgeId)>,
    end: StateKey,
    cost: f64,
) -> WeightedPath {
    let mut nodes = vec![view.index_to_node[end.0]];
    let mut edges = Vec::new();
    let mut current = end;
    while let Some(&(prev, edge)) = parent.get(&current) {
        nodes.push(view.index_to_node[prev.0]);
        edges.push(edge);
        current = prev;
    }
    nodes.reverse();
    edges.reverse();

    WeightedPath {
        nodes,
        edges,
        strength: (-cost).exp(),
    }
}
