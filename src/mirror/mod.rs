//! Semantic mirror: an RDF projection of the causal graph
//!
//! The graph store publishes [`GraphEvent`](crate::graph::GraphEvent)s on its
//! change feed; a synchronizer applies them to a [`SemanticMirror`]. The mirror
//! only ever reads from the feed and never writes back into the store.
//!
//! # Example
//!
//! ```rust
//! use orgcausal::graph::{GraphStore, Initiative};
//! use orgcausal::mirror::{drain, GraphToRdfMapper, SemanticMirror};
//!
//! let (mut store, mut feed) = GraphStore::with_change_feed();
//! store.add_vertex(Initiative::new("Pilot", "Engineering")).unwrap();
//!
//! let mut mirror = SemanticMirror::new(GraphToRdfMapper::new("http://example.org/").unwrap());
//! drain(&mut feed, &mut mirror);
//! assert!(!mirror.is_empty());
//! ```

mod mapping;
mod store;
mod sync;

use thiserror::Error;

pub use mapping::{GraphToRdfMapper, MappingConfig};
pub use store::SemanticMirror;
pub use sync::{drain, run_synchronizer, spawn_synchronizer};

/// Mirror projection errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MirrorError {
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type MirrorResult<T> = Result<T, MirrorError>;
