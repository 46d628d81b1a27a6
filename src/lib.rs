//! Orgcausal
//!
//! A causal property graph of an organization (initiatives, outcomes,
//! employees, metrics, departments and events) with analytics on top.
//!
//! # Components
//!
//! - [`graph`]: typed vertices and strength-weighted causal edges in an in-memory store
//! - [`algo`]: bounded reachability, simple-path enumeration and strongest paths
//! - [`analytics`]: intent/outcome gap, gameable metrics, metric theater, department synergy
//! - [`mirror`]: an RDF projection kept current from the store's change feed
//! - [`engine`]: a thread-safe facade with snapshot-consistent reads
//! - [`config`]: YAML/JSON configuration with compiled defaults
//!
//! ## Example Usage
//!
//! ```rust
//! use orgcausal::graph::{EdgeType, Initiative, Metric, Outcome, OutcomeType};
//! use orgcausal::{CausalEngine, GapAnalysis};
//!
//! let engine = CausalEngine::default();
//!
//! let initiative = engine.create_vertex(Initiative::new("Four-day week", "Engineering")).unwrap();
//! let intended = engine.create_vertex(Outcome::new("Less burnout", OutcomeType::Intended, 3.0)).unwrap();
//! let side_effect = engine.create_vertex(Outcome::new("Slower support", OutcomeType::Unintended, 5.0)).unwrap();
//! let metric = engine.create_vertex(Metric::new("Tickets closed", 50.0, Some(90.0))).unwrap();
//!
//! engine.create_edge(EdgeType::Causes, initiative, intended, 0.8, None).unwrap();
//! engine.create_edge(EdgeType::Causes, initiative, side_effect, 0.6, None).unwrap();
//! engine.create_edge(EdgeType::Measures, initiative, metric, 1.0, None).unwrap();
//!
//! let report = engine.calculate_gap(initiative).unwrap();
//! assert_eq!(report.analysis, GapAnalysis::Moderate);
//! assert!((report.gap_score - 32.22).abs() < 0.01);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod analytics;
pub mod config;
pub mod engine;
pub mod graph;
pub mod mirror;

// Re-export main types for convenience
pub use graph::{
    Direction, Edge, EdgeId, EdgeType, GraphError, GraphEvent, GraphResult, GraphSnapshot, GraphStatistics,
    GraphStore, Vertex, VertexAttributes, VertexId, VertexKind,
};

pub use algo::{CausalPath, PathQuery, TraversalHit, TraversalQuery};

pub use analytics::{
    GameableMetric, GapAnalysis, GapReport, SuspicionLevel, SynergyGrade, SynergyReport, TheaterMetric,
};

pub use config::{ConfigError, ConfigResult, EngineConfig};

pub use engine::{CausalEngine, EngineError, EngineResult};

pub use mirror::{GraphToRdfMapper, MirrorError, MirrorResult, SemanticMirror};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
