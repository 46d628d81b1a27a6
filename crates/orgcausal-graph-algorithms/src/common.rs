//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.
//! A view is built once per query, which also makes it the snapshot the query runs against.

use rustc_hash::FxHashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// Edge Identifier type (u64)
pub type EdgeId = u64;

/// Which edges to follow from a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Follow edges from source to target
    Outgoing,
    /// Follow edges from target to source
    Incoming,
    /// Follow edges regardless of orientation
    Both,
}

impl Direction {
    fn follows_outgoing(self) -> bool {
        matches!(self, Direction::Outgoing | Direction::Both)
    }

    fn follows_incoming(self) -> bool {
        matches!(self, Direction::Incoming | Direction::Both)
    }
}

/// One step away from a node: the neighbour's dense index, the edge used and its weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjacent {
    pub index: usize,
    pub edge: EdgeId,
    pub weight: f64,
}

/// Adjacency entry used to build a view: (neighbour index, edge id, weight)
pub type AdjacencyEntry = (usize, EdgeId, f64);

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Edge order inside each row is preserved from the input lists, so callers that
/// build the view from insertion-ordered adjacency get insertion-ordered traversal.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: FxHashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,
    /// Edge ids aligned with `out_targets`
    pub out_edges: Vec<EdgeId>,
    /// Edge weights aligned with `out_targets`
    pub out_weights: Vec<f64>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,
    /// Edge ids aligned with `in_sources`
    pub in_edges: Vec<EdgeId>,
    /// Edge weights aligned with `in_sources`
    pub in_weights: Vec<f64>,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Dense index of a node, if the node is part of this view
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.node_to_index.get(&node).copied()
    }

    /// Iterate the neighbours of a node in the given direction.
    ///
    /// For `Direction::Both` outgoing entries come first, then incoming ones.
    pub fn adjacent(&self, idx: usize, direction: Direction) -> impl Iterator<Item = Adjacent> + '_ {
        let out_range = if direction.follows_outgoing() {
            self.out_offsets[idx]..self.out_offsets[idx + 1]
        } else {
            0..0
        };
        let in_range = if direction.follows_incoming() {
            self.in_offsets[idx]..self.in_offsets[idx + 1]
        } else {
            0..0
        };

        out_range
            .map(move |i| Adjacent {
                index: self.out_targets[i],
                edge: self.out_edges[i],
                weight: self.out_weights[i],
            })
            .chain(in_range.map(move |i| Adjacent {
                index: self.in_sources[i],
                edge: self.in_edges[i],
                weight: self.in_weights[i],
            }))
    }

    /// Build a view from per-node adjacency lists.
    ///
    /// `outgoing[i]` lists the edges leaving node `i`, `incoming[i]` the edges arriving at it;
    /// both hold `(neighbour index, edge id, weight)`.
    pub fn from_adjacency_list(
        index_to_node: Vec<NodeId>,
        outgoing: Vec<Vec<AdjacencyEntry>>,
        incoming: Vec<Vec<AdjacencyEntry>>,
    ) -> Self {
        let node_count = index_to_node.len();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &node)| (node, idx))
            .collect();

        let (out_offsets, out_targets, out_edges, out_weights) = flatten(node_count, outgoing);
        let (in_offsets, in_sources, in_edges, in_weights) = flatten(node_count, incoming);

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            out_edges,
            out_weights,
            in_offsets,
            in_sources,
            in_edges,
            in_weights,
        }
    }
}

type Csr = (Vec<usize>, Vec<usize>, Vec<EdgeId>, Vec<f64>);

fn flatten(node_count: usize, rows: Vec<Vec<AdjacencyEntry>>) -> Csr {
    let mut offsets = Vec::with_capacity(node_count + 1);
    let mut neighbours = Vec::new();
    let mut edges = Vec::new();
    let mut weights = Vec::new();

    offsets.push(0);
    for row in rows.into_iter().take(node_count) {
        for (neighbour, edge, weight) in row {
            neighbours.push(neighbour);
            edges.push(edge);
            weights.push(weight);
        }
        offsets.push(neighbours.len());
    }
    // Rows missing from the input are empty
    while offsets.len() < node_count + 1 {
        offsets.push(neighbours.len());
    }

    (offsets, neighbours, edges, weights)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a view from `(source, target, edge_id, weight)` tuples over nodes `1..=n`.
    pub fn view_from_edges(n: u64, edges: &[(NodeId, NodeId, EdgeId, f64)]) -> GraphView {
        let index_to_node: Vec<NodeId> = (1..=n).collect();
        let mut outgoing = vec![Vec::new(); n as usize];
        let mut incoming = vec![Vec::new(); n as usize];
        for &(s, t, e, w) in edges {
            let (si, ti) = ((s - 1) as usize, (t - 1) as usize);
            outgoing[si].push((ti, e, w));
            incoming[ti].push((si, e, w));
        }
        GraphView::from_adjacency_list(index_to_node, outgoing, incoming)
    }
}
