//! Graph change events
//!
//! Captures committed changes to the graph so secondary representations
//! (the semantic mirror, caches, audit logs) can follow along.

use super::edge::Edge;
use super::types::{EdgeId, VertexId};
use super::vertex::Vertex;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    VertexCreated {
        vertex: Vertex,
    },
    VertexUpdated {
        previous: Vertex,
        current: Vertex,
    },
    /// Emitted after the incident edges' `EdgeRemoved` events
    VertexRemoved {
        vertex: Vertex,
    },
    EdgeCreated {
        edge: Edge,
    },
    EdgeRemoved {
        edge: Edge,
    },
}

impl GraphEvent {
    pub fn vertex_id(&self) -> Option<VertexId> {
        match self {
            GraphEvent::VertexCreated { vertex } | GraphEvent::VertexRemoved { vertex } => Some(vertex.id),
            GraphEvent::VertexUpdated { current, .. } => Some(current.id),
            GraphEvent::EdgeCreated { .. } | GraphEvent::EdgeRemoved { .. } => None,
        }
    }

    pub fn edge_id(&self) -> Option<EdgeId> {
        match self {
            GraphEvent::EdgeCreated { edge } | GraphEvent::EdgeRemoved { edge } => Some(edge.id),
            _ => None,
        }
    }
}
