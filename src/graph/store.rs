//! In-memory causal graph storage
//!
//! Vertices and edges live in id-indexed arenas with per-vertex adjacency lists
//! kept in insertion order. Every mutation validates completely before touching
//! any structure, so a failed call leaves the store unchanged.

use super::edge::Edge;
use super::event::GraphEvent;
use super::types::{EdgeId, EdgeType, VertexId, VertexKind};
use super::vertex::{Vertex, VertexAttributes};
use indexmap::IndexSet;
use orgcausal_graph_algorithms::Direction;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Dangling reference: vertex {0} does not exist")]
    DanglingReference(VertexId),

    #[error("Vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Vertex {id} is a {found}, expected {expected}")]
    KindMismatch {
        id: VertexId,
        expected: VertexKind,
        found: VertexKind,
    },

    #[error("Vertex {0} already exists")]
    VertexAlreadyExists(VertexId),

    #[error("Edge {0} already exists")]
    EdgeAlreadyExists(EdgeId),

    #[error("Graph lock poisoned by a panicking writer")]
    Poisoned,
}

impl GraphError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        GraphError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors meaning "the referenced thing is not there (as that kind)"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::VertexNotFound(_) | GraphError::EdgeNotFound(_) | GraphError::KindMismatch { .. }
        )
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Summary counts over the store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub vertices_by_kind: BTreeMap<VertexKind, usize>,
    pub edges_by_type: BTreeMap<EdgeType, usize>,
    /// Mean edge strength, 0 without edges
    pub average_strength: f64,
}

/// In-memory graph storage
///
/// - vertices: VertexId -> Vertex (arena, `None` once removed)
/// - edges: EdgeId -> Edge (arena, `None` once removed)
/// - outgoing / incoming: VertexId -> Vec<EdgeId> in insertion order
/// - kind_index: VertexKind -> vertices of that kind in insertion order
/// - edge_type_index: EdgeType -> edges of that type in insertion order
///
/// Identifiers are never reused.
#[derive(Debug)]
pub struct GraphStore {
    vertices: Vec<Option<Vertex>>,
    edges: Vec<Option<Edge>>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    kind_index: FxHashMap<VertexKind, IndexSet<VertexId>>,
    edge_type_index: FxHashMap<EdgeType, IndexSet<EdgeId>>,

    /// Change feed consumer, if one is attached
    event_sender: Option<UnboundedSender<GraphEvent>>,

    next_vertex_id: u64,
    next_edge_id: u64,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            vertices: Vec::with_capacity(1024),
            edges: Vec::with_capacity(4096),
            outgoing: Vec::with_capacity(1024),
            incoming: Vec::with_capacity(1024),
            kind_index: FxHashMap::default(),
            edge_type_index: FxHashMap::default(),
            event_sender: None,
            next_vertex_id: 1,
            next_edge_id: 1,
        }
    }

    /// Create a store that publishes every committed change on the returned receiver
    pub fn with_change_feed() -> (Self, UnboundedReceiver<GraphEvent>) {
        let mut store = Self::new();
        let rx = store.attach_change_feed();
        (store, rx)
    }

    /// Attach a (new) change feed; a previously attached feed stops receiving events
    pub fn attach_change_feed(&mut self) -> UnboundedReceiver<GraphEvent> {
        let (tx, rx) = unbounded_channel();
        self.event_sender = Some(tx);
        rx
    }

    fn emit(&self, event: GraphEvent) {
        if let Some(sender) = &self.event_sender {
            if sender.send(event).is_err() {
                trace!("Change feed receiver dropped; event discarded");
            }
        }
    }

    // ============================================================
    // Vertices
    // ============================================================

    /// Create a vertex with an auto-generated ID
    pub fn add_vertex(&mut self, attributes: impl Into<VertexAttributes>) -> GraphResult<VertexId> {
        let attributes = attributes.into();
        attributes.validate()?;

        let vertex_id = VertexId::new(self.next_vertex_id);
        self.next_vertex_id += 1;

        let vertex = Vertex::new(vertex_id, attributes);
        self.insert_vertex_unchecked(vertex.clone());
        debug!("Created {} vertex {}", vertex.kind(), vertex_id);

        self.emit(GraphEvent::VertexCreated { vertex });
        Ok(vertex_id)
    }

    /// Replace a vertex's attributes wholesale. The kind must stay the same.
    pub fn update_vertex(&mut self, id: VertexId, attributes: impl Into<VertexAttributes>) -> GraphResult<()> {
        let attributes = attributes.into();
        let existing = self.get_vertex(id).ok_or(GraphError::VertexNotFound(id))?;
        if existing.kind() != attributes.kind() {
            return Err(GraphError::KindMismatch {
                id,
                expected: existing.kind(),
                found: attributes.kind(),
            });
        }
        attributes.validate()?;

        let slot = self
            .vertices
            .get_mut(id.as_u64() as usize)
            .and_then(|v| v.as_mut())
            .ok_or(GraphError::VertexNotFound(id))?;
        let previous = slot.clone();
        slot.replace_attributes(attributes);
        let current = slot.clone();
        debug!("Updated {} vertex {}", current.kind(), id);

        self.emit(GraphEvent::VertexUpdated { previous, current });
        Ok(())
    }

    /// Delete a vertex and all its connected edges
    pub fn remove_vertex(&mut self, id: VertexId) -> GraphResult<Vertex> {
        if !self.has_vertex(id) {
            return Err(GraphError::VertexNotFound(id));
        }
        let idx = id.as_u64() as usize;

        let mut incident: Vec<EdgeId> = self.outgoing[idx].clone();
        for edge_id in &self.incoming[idx] {
            if !incident.contains(edge_id) {
                incident.push(*edge_id);
            }
        }
        for edge_id in incident {
            self.remove_edge(edge_id)?;
        }

        let vertex = self.vertices[idx].take().ok_or(GraphError::VertexNotFound(id))?;
        if let Some(ids) = self.kind_index.get_mut(&vertex.kind()) {
            ids.shift_remove(&id);
        }
        debug!("Removed {} vertex {}", vertex.kind(), id);

        self.emit(GraphEvent::VertexRemoved { vertex: vertex.clone() });
        Ok(vertex)
    }

    /// Get a vertex by ID
    pub fn get_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.as_u64() as usize).and_then(|v| v.as_ref())
    }

    /// Get a vertex by ID, requiring it to be of `kind`
    pub fn get_vertex_of_kind(&self, id: VertexId, kind: VertexKind) -> GraphResult<&Vertex> {
        let vertex = self.get_vertex(id).ok_or(GraphError::VertexNotFound(id))?;
        if vertex.kind() != kind {
            return Err(GraphError::KindMismatch {
                id,
                expected: kind,
                found: vertex.kind(),
            });
        }
        Ok(vertex)
    }

    /// Check if a vertex exists
    pub fn has_vertex(&self, id: VertexId) -> bool {
        self.get_vertex(id).is_some()
    }

    /// All vertices of a kind, in insertion order
    pub fn vertices_of_kind(&self, kind: VertexKind) -> Vec<&Vertex> {
        self.kind_index
            .get(&kind)
            .map(|ids| ids.iter().filter_map(|&id| self.get_vertex(id)).collect())
            .unwrap_or_default()
    }

    /// All vertices, in id order
    pub fn all_vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().flatten()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.iter().flatten().count()
    }

    // ============================================================
    // Edges
    // ============================================================

    /// Create an edge between two existing vertices
    pub fn add_edge(
        &mut self,
        edge_type: EdgeType,
        source: VertexId,
        target: VertexId,
        strength: f64,
        evidence: Option<String>,
    ) -> GraphResult<EdgeId> {
        let edge_id = EdgeId::new(self.next_edge_id);
        let edge = Edge::new(edge_id, source, target, edge_type, strength, evidence);
        self.check_edge(&edge)?;

        self.next_edge_id += 1;
        self.insert_edge_unchecked(edge.clone());
        debug!(
            "Created edge {} {} -[{}]-> {} (strength {:.3})",
            edge_id, source, edge_type, target, strength
        );

        self.emit(GraphEvent::EdgeCreated { edge });
        Ok(edge_id)
    }

    /// Delete an edge
    pub fn remove_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .get_mut(id.as_u64() as usize)
            .and_then(|e| e.take())
            .ok_or(GraphError::EdgeNotFound(id))?;

        if let Some(ids) = self.edge_type_index.get_mut(&edge.edge_type) {
            ids.shift_remove(&id);
        }
        if let Some(adj) = self.outgoing.get_mut(edge.source.as_u64() as usize) {
            adj.retain(|&eid| eid != id);
        }
        if let Some(adj) = self.incoming.get_mut(edge.target.as_u64() as usize) {
            adj.retain(|&eid| eid != id);
        }
        debug!("Removed edge {}", id);

        self.emit(GraphEvent::EdgeRemoved { edge: edge.clone() });
        Ok(edge)
    }

    /// Get an edge by ID
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.as_u64() as usize).and_then(|e| e.as_ref())
    }

    /// Check if an edge exists
    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.get_edge(id).is_some()
    }

    /// Get all outgoing edges from a vertex, in insertion order
    pub fn outgoing_edges(&self, id: VertexId) -> Vec<&Edge> {
        self.edges_from_list(self.outgoing.get(id.as_u64() as usize))
    }

    /// Get all incoming edges to a vertex, in insertion order
    pub fn incoming_edges(&self, id: VertexId) -> Vec<&Edge> {
        self.edges_from_list(self.incoming.get(id.as_u64() as usize))
    }

    fn edges_from_list(&self, list: Option<&Vec<EdgeId>>) -> Vec<&Edge> {
        list.map(|ids| ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }

    /// All edges of a type, in insertion order
    pub fn edges_of_type(&self, edge_type: EdgeType) -> Vec<&Edge> {
        self.edge_type_index
            .get(&edge_type)
            .map(|ids| ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }

    /// All edges, in id order
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().flatten()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Neighbouring vertices together with the edge leading to them.
    ///
    /// Order is edge insertion order; with `Direction::Both` outgoing edges come
    /// first. `edge_types = None` accepts every type. Unknown vertices have no neighbours.
    pub fn neighbors(
        &self,
        id: VertexId,
        direction: Direction,
        edge_types: Option<&[EdgeType]>,
    ) -> Vec<(&Edge, &Vertex)> {
        let mut edges = Vec::new();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            edges.extend(self.outgoing_edges(id));
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            edges.extend(self.incoming_edges(id));
        }

        edges
            .into_iter()
            .filter(|edge| edge_types.map_or(true, |types| types.contains(&edge.edge_type)))
            .filter_map(|edge| {
                self.get_vertex(edge.other_end(id))
                    .map(|vertex| (edge, vertex))
            })
            .collect()
    }

    // ============================================================
    // Bulk operations
    // ============================================================

    /// Summary counts
    pub fn statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics::default();
        for vertex in self.all_vertices() {
            stats.vertex_count += 1;
            *stats.vertices_by_kind.entry(vertex.kind()).or_insert(0) += 1;
        }
        let mut strength_sum = 0.0;
        for edge in self.all_edges() {
            stats.edge_count += 1;
            strength_sum += edge.strength;
            *stats.edges_by_type.entry(edge.edge_type).or_insert(0) += 1;
        }
        if stats.edge_count > 0 {
            stats.average_strength = strength_sum / stats.edge_count as f64;
        }
        stats
    }

    /// Clear all data from the graph. Identifiers keep increasing.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.kind_index.clear();
        self.edge_type_index.clear();
    }

    // ============================================================
    // Internals shared with snapshot import
    // ============================================================

    /// Validate an edge against the current store without inserting it
    pub(crate) fn check_edge(&self, edge: &Edge) -> GraphResult<()> {
        check_strength(edge.strength)?;
        let source = self
            .get_vertex(edge.source)
            .ok_or(GraphError::DanglingReference(edge.source))?;
        let target = self
            .get_vertex(edge.target)
            .ok_or(GraphError::DanglingReference(edge.target))?;
        check_endpoints(edge.edge_type, source.kind(), target.kind())
    }

    pub(crate) fn insert_vertex_unchecked(&mut self, vertex: Vertex) {
        let id = vertex.id;
        let idx = id.as_u64() as usize;

        if idx >= self.vertices.len() {
            self.vertices.resize(idx + 1, None);
            self.outgoing.resize(idx + 1, Vec::new());
            self.incoming.resize(idx + 1, Vec::new());
        }

        self.kind_index.entry(vertex.kind()).or_default().insert(id);
        self.vertices[idx] = Some(vertex);

        if id.as_u64() >= self.next_vertex_id {
            self.next_vertex_id = id.as_u64() + 1;
        }
    }

    pub(crate) fn insert_edge_unchecked(&mut self, edge: Edge) {
        let id = edge.id;
        let idx = id.as_u64() as usize;

        if idx >= self.edges.len() {
            self.edges.resize(idx + 1, None);
        }

        self.outgoing[edge.source.as_u64() as usize].push(id);
        self.incoming[edge.target.as_u64() as usize].push(id);
        self.edge_type_index.entry(edge.edge_type).or_default().insert(id);
        self.edges[idx] = Some(edge);

        if id.as_u64() >= self.next_edge_id {
            self.next_edge_id = id.as_u64() + 1;
        }
    }

    /// Next identifiers the allocator would hand out (vertex, edge)
    pub(crate) fn next_ids(&self) -> (u64, u64) {
        (self.next_vertex_id, self.next_edge_id)
    }

    pub(crate) fn publish(&self, event: GraphEvent) {
        self.emit(event);
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_strength(strength: f64) -> GraphResult<()> {
    if !(0.0..=1.0).contains(&strength) {
        return Err(GraphError::validation(
            "edge.strength",
            format!("{} is outside [0, 1]", strength),
        ));
    }
    Ok(())
}

pub(crate) fn check_endpoints(edge_type: EdgeType, source: VertexKind, target: VertexKind) -> GraphResult<()> {
    if !edge_type.admits(source, target) {
        return Err(GraphError::validation(
            "edge.edge_type",
            format!("'{}' cannot connect {} -> {}", edge_type, source, target),
        ));
    }
    Ok(())
}
