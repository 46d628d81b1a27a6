//! In-memory triple set backing the semantic mirror

use super::mapping::GraphToRdfMapper;
use super::MirrorResult;
use crate::graph::{GraphEvent, GraphStore};
use indexmap::{IndexMap, IndexSet};
use oxrdf::{NamedNode, Subject, Triple};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// RDF projection of the causal graph
///
/// - triples: Triple -> number of graph records asserting it, in first-insertion order
/// - subject_index: Subject -> triples with that subject
///
/// Counting matters for direct edge triples: two parallel edges of one type
/// assert the same `(source, predicate, target)` triple, and it must survive
/// the removal of either one.
#[derive(Debug)]
pub struct SemanticMirror {
    mapper: GraphToRdfMapper,
    triples: IndexMap<Triple, usize>,
    subject_index: FxHashMap<Subject, IndexSet<Triple>>,
    applied_events: u64,
}

impl SemanticMirror {
    pub fn new(mapper: GraphToRdfMapper) -> Self {
        Self {
            mapper,
            triples: IndexMap::new(),
            subject_index: FxHashMap::default(),
            applied_events: 0,
        }
    }

    pub fn mapper(&self) -> &GraphToRdfMapper {
        &self.mapper
    }

    /// Project one committed graph change
    pub fn apply(&mut self, event: &GraphEvent) -> MirrorResult<()> {
        match event {
            GraphEvent::VertexCreated { vertex } => {
                let triples = self.mapper.map_vertex(vertex)?;
                self.insert_all(triples);
            }
            GraphEvent::VertexUpdated { previous, current } => {
                let old = self.mapper.map_vertex(previous)?;
                let new = self.mapper.map_vertex(current)?;
                self.remove_all(&old);
                self.insert_all(new);
            }
            GraphEvent::VertexRemoved { vertex } => {
                let triples = self.mapper.map_vertex(vertex)?;
                self.remove_all(&triples);
            }
            GraphEvent::EdgeCreated { edge } => {
                let triples = self.mapper.map_edge(edge)?;
                self.insert_all(triples);
            }
            GraphEvent::EdgeRemoved { edge } => {
                let triples = self.mapper.map_edge(edge)?;
                self.remove_all(&triples);
            }
        }
        self.applied_events += 1;
        trace!("Mirror applied event, {} triples", self.triples.len());
        Ok(())
    }

    /// Project every vertex and edge currently in `store`.
    ///
    /// Used to seed a mirror before it starts following the change feed.
    /// Returns the number of records projected.
    pub fn project_store(&mut self, store: &GraphStore) -> MirrorResult<usize> {
        let mut projected = 0;
        for vertex in store.all_vertices() {
            let triples = self.mapper.map_vertex(vertex)?;
            self.insert_all(triples);
            projected += 1;
        }
        for edge in store.all_edges() {
            let triples = self.mapper.map_edge(edge)?;
            self.insert_all(triples);
            projected += 1;
        }
        debug!("Projected {} graph records into the mirror", projected);
        Ok(projected)
    }

    fn insert_all(&mut self, triples: Vec<Triple>) {
        for triple in triples {
            let count = self.triples.entry(triple.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                self.subject_index
                    .entry(triple.subject.clone())
                    .or_default()
                    .insert(triple);
            }
        }
    }

    fn remove_all(&mut self, triples: &[Triple]) {
        for triple in triples {
            let Some(count) = self.triples.get_mut(triple) else {
                continue;
            };
            *count -= 1;
            if *count > 0 {
                continue;
            }
            self.triples.swap_remove(triple);
            if let Some(by_subject) = self.subject_index.get_mut(&triple.subject) {
                by_subject.swap_remove(triple);
                if by_subject.is_empty() {
                    self.subject_index.remove(&triple.subject);
                }
            }
        }
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains_key(triple)
    }

    /// Number of distinct triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Events applied since creation
    pub fn applied_events(&self) -> u64 {
        self.applied_events
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.keys()
    }

    /// Triples with a specific subject
    pub fn triples_with_subject(&self, subject: &Subject) -> Vec<&Triple> {
        self.subject_index
            .get(subject)
            .map(|triples| triples.iter().collect())
            .unwrap_or_default()
    }

    /// Triples with a specific predicate
    pub fn triples_with_predicate(&self, predicate: &NamedNode) -> Vec<&Triple> {
        self.triples
            .keys()
            .filter(|triple| &triple.predicate == predicate)
            .collect()
    }

    /// N-Triples rendering, one triple per line
    pub fn to_ntriples(&self) -> String {
        let mut out = String::new();
        for triple in self.triples.keys() {
            out.push_str(&triple.to_string());
            out.push_str(" .\n");
        }
        out
    }

    pub fn clear(&mut self) {
        self.triples.clear();
        self.subject_index.clear();
    }
}
