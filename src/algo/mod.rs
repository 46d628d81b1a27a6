//! Traversal engine
//!
//! Algorithms are implemented in the `orgcausal-graph-algorithms` crate.
//! This module provides the integration layer: it builds a `GraphView` from the
//! store (restricted to the requested edge types) and maps results back to vertices.

use crate::graph::{
    Direction, EdgeId, EdgeType, GraphError, GraphResult, GraphStore, OutcomeType, Vertex, VertexId,
};
use orgcausal_graph_algorithms::{AdjacencyEntry, GraphView, PathSearch, WeightedPath};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// Re-export algorithms
pub use orgcausal_graph_algorithms::{all_simple_paths, bounded_reach, reaches_any, strongest_path};

/// Build a GraphView from the store for algorithm execution.
///
/// Every vertex is part of the view; only edges whose type is in `edge_types`
/// (all edges when `None`) are. Adjacency keeps the store's insertion order.
pub fn build_view(store: &GraphStore, edge_types: Option<&[EdgeType]>) -> GraphView {
    let vertices: Vec<VertexId> = store.all_vertices().map(|v| v.id).collect();
    let index_of: rustc_hash::FxHashMap<VertexId, usize> =
        vertices.iter().enumerate().map(|(idx, &id)| (id, idx)).collect();

    let accepts = |edge_type: EdgeType| edge_types.map_or(true, |types| types.contains(&edge_type));

    let mut outgoing: Vec<Vec<AdjacencyEntry>> = Vec::with_capacity(vertices.len());
    let mut incoming: Vec<Vec<AdjacencyEntry>> = Vec::with_capacity(vertices.len());

    for &id in &vertices {
        let out_row = store
            .outgoing_edges(id)
            .into_iter()
            .filter(|e| accepts(e.edge_type))
            .filter_map(|e| index_of.get(&e.target).map(|&t| (t, e.id.as_u64(), e.strength)))
            .collect();
        let in_row = store
            .incoming_edges(id)
            .into_iter()
            .filter(|e| accepts(e.edge_type))
            .filter_map(|e| index_of.get(&e.source).map(|&s| (s, e.id.as_u64(), e.strength)))
            .collect();
        outgoing.push(out_row);
        incoming.push(in_row);
    }

    GraphView::from_adjacency_list(
        vertices.iter().map(|id| id.as_u64()).collect(),
        outgoing,
        incoming,
    )
}

/// Parameters of a bounded reachability query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalQuery {
    /// Maximum number of hops from the start vertex
    pub max_depth: usize,
    pub direction: Direction,
    /// Edge types to follow; all when `None`
    #[serde(default)]
    pub edge_types: Option<Vec<EdgeType>>,
    /// Only report outcomes of this type (traversal still passes through everything)
    #[serde(default)]
    pub outcome_type: Option<OutcomeType>,
}

impl TraversalQuery {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            direction: Direction::Outgoing,
            edge_types: None,
            outcome_type: None,
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn along(mut self, edge_types: &[EdgeType]) -> Self {
        self.edge_types = Some(edge_types.to_vec());
        self
    }

    pub fn outcome_type(mut self, outcome_type: OutcomeType) -> Self {
        self.outcome_type = Some(outcome_type);
        self
    }

    fn admits(&self, vertex: &Vertex) -> bool {
        match self.outcome_type {
            None => true,
            Some(wanted) => vertex.as_outcome().map_or(false, |o| o.outcome_type == wanted),
        }
    }
}

/// A vertex found by a traversal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraversalHit {
    pub vertex: Vertex,
    /// Minimal number of hops from the start vertex
    pub depth: usize,
}

/// Distinct vertices reachable from `start` within `query.max_depth` hops.
///
/// The start vertex is not included. Ordered by depth, then discovery order.
pub fn traverse(store: &GraphStore, start: VertexId, query: &TraversalQuery) -> GraphResult<Vec<TraversalHit>> {
    require_vertex(store, start)?;
    let view = build_view(store, query.edge_types.as_deref());
    Ok(traverse_view(store, &view, start, query))
}

/// Same as [`traverse`] over a prebuilt view (whose edge filter takes precedence)
pub(crate) fn traverse_view(
    store: &GraphStore,
    view: &GraphView,
    start: VertexId,
    query: &TraversalQuery,
) -> Vec<TraversalHit> {
    bounded_reach(view, start.as_u64(), query.max_depth, query.direction)
        .into_iter()
        .filter_map(|reached| {
            store
                .get_vertex(VertexId::new(reached.node))
                .filter(|vertex| query.admits(vertex))
                .map(|vertex| TraversalHit {
                    vertex: vertex.clone(),
                    depth: reached.depth,
                })
        })
        .collect()
}

/// Parameters of a path enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathQuery {
    /// Maximum number of edges on a path
    pub max_depth: usize,
    pub direction: Direction,
    #[serde(default)]
    pub edge_types: Option<Vec<EdgeType>>,
    /// Cap on the number of paths enumerated
    #[serde(default)]
    pub max_paths: Option<usize>,
}

impl PathQuery {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            direction: Direction::Outgoing,
            edge_types: None,
            max_paths: None,
        }
    }

    pub fn along(mut self, edge_types: &[EdgeType]) -> Self {
        self.edge_types = Some(edge_types.to_vec());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = Some(max_paths);
        self
    }
}

/// A simple path between two vertices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CausalPath {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    /// Product of the edge strengths
    pub strength: f64,
    /// Number of vertices on the path
    pub length: usize,
}

impl From<WeightedPath> for CausalPath {
    fn from(path: WeightedPath) -> Self {
        CausalPath {
            length: path.len(),
            vertices: path.nodes.into_iter().map(VertexId::new).collect(),
            edges: path.edges.into_iter().map(EdgeId::new).collect(),
            strength: path.strength,
        }
    }
}

/// All simple paths from `from` to `to` within `query.max_depth` edges.
///
/// Sorted by strength (descending), then length (ascending); equal paths keep
/// discovery order. No path is not an error.
pub fn find_paths(store: &GraphStore, from: VertexId, to: VertexId, query: &PathQuery) -> GraphResult<Vec<CausalPath>> {
    require_vertex(store, from)?;
    require_vertex(store, to)?;

    let view = build_view(store, query.edge_types.as_deref());
    let search = PathSearch {
        max_depth: query.max_depth,
        direction: query.direction,
        max_paths: query.max_paths,
    };
    let set = all_simple_paths(&view, from.as_u64(), to.as_u64(), &search);
    if set.truncated {
        warn!(
            "Path enumeration {} -> {} stopped at {} paths",
            from,
            to,
            set.paths.len()
        );
    }

    let mut paths: Vec<CausalPath> = set.paths.into_iter().map(CausalPath::from).collect();
    paths.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| a.length.cmp(&b.length))
    });
    debug!("Found {} paths {} -> {}", paths.len(), from, to);
    Ok(paths)
}

/// The path from `from` to `to` with the highest strength product, if any
pub fn find_strongest_path(
    store: &GraphStore,
    from: VertexId,
    to: VertexId,
    query: &PathQuery,
) -> GraphResult<Option<CausalPath>> {
    require_vertex(store, from)?;
    require_vertex(store, to)?;

    let view = build_view(store, query.edge_types.as_deref());
    Ok(strongest_path(&view, from.as_u64(), to.as_u64(), query.max_depth, query.direction).map(CausalPath::from))
}

fn require_vertex(store: &GraphStore, id: VertexId) -> GraphResult<()> {
    if store.has_vertex(id) {
        Ok(())
    } else {
        Err(GraphError::VertexNotFound(id))
    }
}
