//! Whole-graph snapshots
//!
//! A snapshot is the serializable form in which boundary collaborators hand a
//! graph to the engine. Import keeps the identifiers it is given and is
//! all-or-nothing: every vertex and edge is checked before the first insert.

use super::edge::Edge;
use super::event::GraphEvent;
use super::store::{check_endpoints, check_strength, GraphError, GraphResult, GraphStore};
use super::types::{EdgeId, VertexId, VertexKind};
use super::vertex::Vertex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::info;

/// How far past the allocator (plus the snapshot's own size) an imported id may reach.
///
/// Imported ids index the store's arenas directly.
pub const MAX_IMPORT_ID_GAP: u64 = 1 << 16;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Counts of what an import added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub vertices: usize,
    pub edges: usize,
}

impl GraphStore {
    /// Copy the current graph into a snapshot (vertices and edges in id order)
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            vertices: self.all_vertices().cloned().collect(),
            edges: self.all_edges().cloned().collect(),
        }
    }

    /// Insert a snapshot's vertices and edges, preserving their identifiers.
    ///
    /// Fails without changing the store if any vertex is invalid, any identifier
    /// collides with the store or the snapshot itself, lies too far past the
    /// allocator (see [`MAX_IMPORT_ID_GAP`]), or any edge is invalid or refers
    /// to a vertex present in neither.
    pub fn import_snapshot(&mut self, snapshot: GraphSnapshot) -> GraphResult<ImportSummary> {
        let (next_vertex, next_edge) = self.next_ids();
        let vertex_limit = id_limit(next_vertex, snapshot.vertices.len());
        let edge_limit = id_limit(next_edge, snapshot.edges.len());

        let mut incoming_kinds: FxHashMap<VertexId, VertexKind> = FxHashMap::default();
        for vertex in &snapshot.vertices {
            check_id("vertex.id", vertex.id.as_u64(), vertex_limit)?;
            vertex.attributes.validate()?;
            if self.has_vertex(vertex.id) || incoming_kinds.insert(vertex.id, vertex.kind()).is_some() {
                return Err(GraphError::VertexAlreadyExists(vertex.id));
            }
        }

        let mut incoming_edges: FxHashSet<EdgeId> = FxHashSet::default();
        for edge in &snapshot.edges {
            check_id("edge.id", edge.id.as_u64(), edge_limit)?;
            if self.has_edge(edge.id) || !incoming_edges.insert(edge.id) {
                return Err(GraphError::EdgeAlreadyExists(edge.id));
            }
            check_strength(edge.strength)?;
            let kind_of = |id: VertexId| {
                incoming_kinds
                    .get(&id)
                    .copied()
                    .or_else(|| self.get_vertex(id).map(|v| v.kind()))
                    .ok_or(GraphError::DanglingReference(id))
            };
            check_endpoints(edge.edge_type, kind_of(edge.source)?, kind_of(edge.target)?)?;
        }

        let summary = ImportSummary {
            vertices: snapshot.vertices.len(),
            edges: snapshot.edges.len(),
        };

        for vertex in snapshot.vertices {
            self.insert_vertex_unchecked(vertex.clone());
            self.publish(GraphEvent::VertexCreated { vertex });
        }
        for edge in snapshot.edges {
            self.insert_edge_unchecked(edge.clone());
            self.publish(GraphEvent::EdgeCreated { edge });
        }

        info!(
            "Imported snapshot: {} vertices, {} edges",
            summary.vertices, summary.edges
        );
        Ok(summary)
    }
}

fn id_limit(next: u64, count: usize) -> u64 {
    next.saturating_add(count as u64).saturating_add(MAX_IMPORT_ID_GAP)
}

fn check_id(field: &str, id: u64, limit: u64) -> GraphResult<()> {
    if id < limit {
        Ok(())
    } else {
        Err(GraphError::validation(
            field,
            format!("{} is beyond the importable range (must be below {})", id, limit),
        ))
    }
}
