//! Edge implementation for the causal graph
//!
//! Edges are directed and typed, and carry a strength in [0, 1] expressing
//! confidence in the relationship. Multiple edges between the same pair of
//! vertices are allowed.

use super::types::{EdgeId, EdgeType, VertexId};
use super::vertex::now_millis;
use serde::{Deserialize, Serialize};

/// A directed, weighted edge in the causal graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source vertex (edge goes FROM this vertex)
    pub source: VertexId,

    /// Target vertex (edge goes TO this vertex)
    pub target: VertexId,

    /// Type of relationship
    pub edge_type: EdgeType,

    /// Confidence in [0, 1]
    pub strength: f64,

    /// Free-text justification for the relationship
    #[serde(default)]
    pub evidence: Option<String>,

    /// Discovery timestamp (Unix milliseconds)
    pub discovered_at: i64,
}

impl Edge {
    /// Create a new directed edge; range checks happen in the store
    pub fn new(
        id: EdgeId,
        source: VertexId,
        target: VertexId,
        edge_type: EdgeType,
        strength: f64,
        evidence: Option<String>,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            edge_type,
            strength,
            evidence,
            discovered_at: now_millis(),
        }
    }

    /// Check if this edge connects two specific vertices (in either direction)
    pub fn connects(&self, a: VertexId, b: VertexId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    /// Check if this edge goes FROM a specific vertex
    pub fn starts_from(&self, vertex: VertexId) -> bool {
        self.source == vertex
    }

    /// Check if this edge goes TO a specific vertex
    pub fn ends_at(&self, vertex: VertexId) -> bool {
        self.target == vertex
    }

    /// The endpoint opposite to `vertex`
    pub fn other_end(&self, vertex: VertexId) -> VertexId {
        if self.source == vertex {
            self.target
        } else {
            self.source
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: u64, source: u64, target: u64, edge_type: EdgeType) -> Edge {
        Edge::new(
            EdgeId::new(id),
            VertexId::new(source),
            VertexId::new(target),
            edge_type,
            0.5,
            None,
        )
    }

    #[test]
    fn test_edge_direction() {
        let e = edge(2, 10, 20, EdgeType::Causes);

        assert!(e.starts_from(VertexId::new(10)));
        assert!(e.ends_at(VertexId::new(20)));
        assert!(!e.starts_from(VertexId::new(20)));
        assert!(!e.ends_at(VertexId::new(10)));
        assert_eq!(e.other_end(VertexId::new(10)), VertexId::new(20));
        assert_eq!(e.other_end(VertexId::new(20)), VertexId::new(10));
    }

    #[test]
    fn test_equality_compares_every_field() {
        let e = edge(1, 10, 20, EdgeType::Causes);
        assert_eq!(e, e.clone());

        let mut stronger = e.clone();
        stronger.strength = 0.9;
        assert_ne!(e, stronger);

        let mut moved = e.clone();
        moved.target = VertexId::new(30);
        assert_ne!(e, moved);

        let mut cited = e.clone();
        cited.evidence = Some("survey".into());
        assert_ne!(e, cited);
    }

    #[test]
    fn test_multiple_edges_between_vertices() {
        let a = VertexId::new(100);
        let b = VertexId::new(200);

        let e1 = edge(1, 100, 200, EdgeType::Causes);
        let e2 = edge(2, 100, 200, EdgeType::Influences);
        let e3 = edge(3, 100, 200, EdgeType::Causes);

        assert_ne!(e1, e2);
        assert_ne!(e1, e3);
        assert!(e1.connects(a, b));
        assert!(e2.connects(b, a));
        assert!(!e3.connects(a, VertexId::new(300)));
    }

    #[test]
    fn test_evidence_is_optional_in_json() {
        let json = r#"{"id":7,"source":1,"target":2,"edge_type":"causes","strength":0.7,"discovered_at":0}"#;
        let e: Edge = serde_json::from_str(json).unwrap();
        assert_eq!(e.edge_type, EdgeType::Causes);
        assert_eq!(e.evidence, None);
        assert_eq!(e.strength, 0.7);
    }
}
