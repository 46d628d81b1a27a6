//! Thread-safe facade over the graph store, traversal engine and scorers
//!
//! Every read holds the store's read lock for the whole query, so a query sees
//! one consistent state of the graph. Every write holds the write lock. A lock
//! poisoned by a panicking writer is reported as [`GraphError::Poisoned`].

use crate::algo::{self, CausalPath, PathQuery, TraversalHit, TraversalQuery};
use crate::analytics::{self, GameableMetric, GapReport, SynergyReport, TheaterMetric};
use crate::config::{ConfigError, EngineConfig};
use crate::graph::{
    Direction, Edge, EdgeId, EdgeType, GraphError, GraphEvent, GraphResult, GraphSnapshot, GraphStatistics,
    GraphStore, ImportSummary, Vertex, VertexAttributes, VertexId,
};
use crate::mirror::{GraphToRdfMapper, MirrorError, SemanticMirror};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

/// Errors from engine setup that cross module boundaries
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mirror error: {0}")]
    Mirror(#[from] MirrorError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Causal analytics engine
///
/// Cheap to clone; clones share the same graph.
#[derive(Debug, Clone)]
pub struct CausalEngine {
    store: Arc<RwLock<GraphStore>>,
    config: Arc<EngineConfig>,
}

impl CausalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(GraphStore::new(), config)
    }

    /// Wrap an existing store
    pub fn with_store(store: GraphStore, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
        }
    }

    /// Create an empty engine configured from a YAML or JSON file
    pub fn from_config_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        Ok(Self::new(EngineConfig::load(path)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn read(&self) -> GraphResult<RwLockReadGuard<'_, GraphStore>> {
        self.store.read().map_err(|_| GraphError::Poisoned)
    }

    fn write(&self) -> GraphResult<RwLockWriteGuard<'_, GraphStore>> {
        self.store.write().map_err(|_| GraphError::Poisoned)
    }

    // ============================================================
    // Writes
    // ============================================================

    pub fn create_vertex(&self, attributes: impl Into<VertexAttributes>) -> GraphResult<VertexId> {
        self.write()?.add_vertex(attributes)
    }

    /// Replace a vertex's attributes; the kind cannot change
    pub fn update_vertex(&self, id: VertexId, attributes: impl Into<VertexAttributes>) -> GraphResult<()> {
        self.write()?.update_vertex(id, attributes)
    }

    /// Remove a vertex together with its incident edges
    pub fn remove_vertex(&self, id: VertexId) -> GraphResult<Vertex> {
        self.write()?.remove_vertex(id)
    }

    pub fn create_edge(
        &self,
        edge_type: EdgeType,
        source: VertexId,
        target: VertexId,
        strength: f64,
        evidence: Option<String>,
    ) -> GraphResult<EdgeId> {
        self.write()?.add_edge(edge_type, source, target, strength, evidence)
    }

    pub fn remove_edge(&self, id: EdgeId) -> GraphResult<Edge> {
        self.write()?.remove_edge(id)
    }

    /// Insert a snapshot atomically, keeping its identifiers
    pub fn import_snapshot(&self, snapshot: GraphSnapshot) -> GraphResult<ImportSummary> {
        self.write()?.import_snapshot(snapshot)
    }

    /// Recompute a department's synergy score and store it on the department
    pub fn refresh_synergy_index(&self, department: VertexId) -> GraphResult<SynergyReport> {
        let mut store = self.write()?;
        analytics::refresh_synergy_index(&mut store, department)
    }

    // ============================================================
    // Reads
    // ============================================================

    /// Copy of a vertex, if present
    pub fn get_vertex(&self, id: VertexId) -> GraphResult<Option<Vertex>> {
        Ok(self.read()?.get_vertex(id).cloned())
    }

    pub fn get_edge(&self, id: EdgeId) -> GraphResult<Option<Edge>> {
        Ok(self.read()?.get_edge(id).cloned())
    }

    pub fn neighbors(
        &self,
        id: VertexId,
        direction: Direction,
        edge_types: Option<&[EdgeType]>,
    ) -> GraphResult<Vec<(Edge, Vertex)>> {
        Ok(self
            .read()?
            .neighbors(id, direction, edge_types)
            .into_iter()
            .map(|(edge, vertex)| (edge.clone(), vertex.clone()))
            .collect())
    }

    pub fn traverse(&self, start: VertexId, query: &TraversalQuery) -> GraphResult<Vec<TraversalHit>> {
        let store = self.read()?;
        algo::traverse(&store, start, query)
    }

    /// Simple paths between two vertices; the configured path cap applies
    /// unless the query sets its own
    pub fn find_paths(&self, from: VertexId, to: VertexId, query: &PathQuery) -> GraphResult<Vec<CausalPath>> {
        let query = self.capped(query);
        let store = self.read()?;
        algo::find_paths(&store, from, to, &query)
    }

    pub fn strongest_path(&self, from: VertexId, to: VertexId, query: &PathQuery) -> GraphResult<Option<CausalPath>> {
        let store = self.read()?;
        algo::find_strongest_path(&store, from, to, query)
    }

    /// Default traversal query for this engine's configuration
    pub fn traversal_query(&self) -> TraversalQuery {
        TraversalQuery::new(self.config.traversal.default_max_depth)
    }

    /// Default path query for this engine's configuration
    pub fn path_query(&self) -> PathQuery {
        self.capped(&PathQuery::new(self.config.traversal.default_max_depth))
    }

    fn capped(&self, query: &PathQuery) -> PathQuery {
        let mut query = query.clone();
        if query.max_paths.is_none() {
            query.max_paths = self.config.traversal.max_paths;
        }
        query
    }

    pub fn calculate_gap(&self, initiative: VertexId) -> GraphResult<GapReport> {
        let store = self.read()?;
        analytics::calculate_gap(&store, initiative, &self.config.gap)
    }

    /// Gameable metrics above `threshold`, or the configured threshold when `None`
    pub fn find_gameable_metrics(&self, threshold: Option<f64>) -> GraphResult<Vec<GameableMetric>> {
        let threshold = threshold.unwrap_or(self.config.audit.gameable_threshold);
        let store = self.read()?;
        analytics::find_gameable_metrics(&store, threshold)
    }

    pub fn detect_theater_metrics(&self) -> GraphResult<Vec<TheaterMetric>> {
        let store = self.read()?;
        Ok(analytics::detect_theater_metrics(&store, self.config.audit.theater_depth))
    }

    pub fn calculate_synergy(&self, department: VertexId) -> GraphResult<SynergyReport> {
        let store = self.read()?;
        analytics::calculate_synergy(&store, department)
    }

    pub fn snapshot(&self) -> GraphResult<GraphSnapshot> {
        Ok(self.read()?.snapshot())
    }

    pub fn statistics(&self) -> GraphResult<GraphStatistics> {
        Ok(self.read()?.statistics())
    }

    // ============================================================
    // Semantic mirror
    // ============================================================

    /// Create a mirror of the current graph and the change feed that keeps it current.
    ///
    /// Seeding and attaching happen under one write lock, so no change falls
    /// between the seeded state and the first event on the feed. Attaching a
    /// new feed detaches any previous one.
    pub fn attach_mirror(&self) -> EngineResult<(SemanticMirror, UnboundedReceiver<GraphEvent>)> {
        let mapper = GraphToRdfMapper::new(self.config.mirror.base_iri.clone())?;
        let mut mirror = SemanticMirror::new(mapper);

        let mut store = self.write()?;
        let projected = mirror.project_store(&store)?;
        let feed = store.attach_change_feed();

        info!("Semantic mirror attached with {} records", projected);
        Ok((mirror, feed))
    }
}

impl Default for CausalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
