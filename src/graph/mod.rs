//! Causal property graph
//!
//! This module implements the organizational graph model:
//! - Typed vertices (initiatives, outcomes, employees, metrics, departments, events)
//! - Directed, typed edges with a strength in [0, 1]
//! - In-memory storage with insertion-ordered adjacency and kind/type indices
//! - A change feed for keeping secondary representations in sync

pub mod edge;
pub mod event;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::Edge;
pub use event::GraphEvent;
pub use orgcausal_graph_algorithms::Direction;
pub use snapshot::{GraphSnapshot, ImportSummary};
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore};
pub use types::{EdgeId, EdgeType, VertexId, VertexKind};
pub use vertex::{
    Department, Employee, Event, Initiative, InitiativeStatus, Metric, Outcome, OutcomeType, Vertex,
    VertexAttributes,
};
