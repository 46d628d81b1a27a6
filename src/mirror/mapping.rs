//! Causal graph → RDF mapping
//!
//! # Mapping Strategy
//!
//! - Vertex → `<base>vertex/{id}` with an `rdf:type` of `<base>ontology/{Kind}`
//! - Vertex attributes → one literal triple per defined attribute value
//! - Edge → direct triple `(source, <base>ontology/{edge_type}, target)`
//! - Edge → reified statement `<base>edge/{id}` carrying strength and evidence
//!
//! The mapping is a pure function of the vertex or edge, so the triples a
//! record produced can be recomputed from the record when it goes away.

use super::{MirrorError, MirrorResult};
use crate::graph::{Edge, Vertex, VertexAttributes};
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{Literal, NamedNode, Triple};

/// Mapping configuration
#[derive(Debug, Clone)]
pub struct MappingConfig {
    /// Base IRI for generated IRIs
    pub base_iri: String,

    /// Emit a reified statement per edge
    pub use_reification: bool,
}

impl MappingConfig {
    pub fn new(base_iri: impl Into<String>) -> Self {
        Self {
            base_iri: base_iri.into(),
            use_reification: true,
        }
    }
}

/// Causal graph → RDF mapper
#[derive(Debug, Clone)]
pub struct GraphToRdfMapper {
    config: MappingConfig,
}

impl GraphToRdfMapper {
    /// Create a mapper, checking that the base IRI yields valid IRIs
    pub fn new(base_iri: impl Into<String>) -> MirrorResult<Self> {
        Self::with_config(MappingConfig::new(base_iri))
    }

    pub fn with_config(config: MappingConfig) -> MirrorResult<Self> {
        let mapper = Self { config };
        mapper.iri("ontology/")?;
        Ok(mapper)
    }

    pub fn base_iri(&self) -> &str {
        &self.config.base_iri
    }

    /// IRI naming a vertex
    pub fn vertex_iri(&self, vertex: &Vertex) -> MirrorResult<NamedNode> {
        self.iri(&format!("vertex/{}", vertex.id.as_u64()))
    }

    /// IRI of the reified statement for an edge
    pub fn edge_iri(&self, edge: &Edge) -> MirrorResult<NamedNode> {
        self.iri(&format!("edge/{}", edge.id.as_u64()))
    }

    /// Ontology term (class or property)
    pub fn term(&self, local: &str) -> MirrorResult<NamedNode> {
        self.iri(&format!("ontology/{}", local))
    }

    /// Map a vertex to its type triple and attribute triples
    pub fn map_vertex(&self, vertex: &Vertex) -> MirrorResult<Vec<Triple>> {
        let subject = self.vertex_iri(vertex)?;
        let mut triples = vec![Triple::new(
            subject.clone(),
            rdf::TYPE,
            self.term(vertex.kind().as_str())?,
        )];

        for (property, value) in attribute_literals(&vertex.attributes) {
            triples.push(Triple::new(subject.clone(), self.term(property)?, value));
        }
        Ok(triples)
    }

    /// Map an edge to its direct triple and, if enabled, its reified statement
    pub fn map_edge(&self, edge: &Edge) -> MirrorResult<Vec<Triple>> {
        let source = self.iri(&format!("vertex/{}", edge.source.as_u64()))?;
        let target = self.iri(&format!("vertex/{}", edge.target.as_u64()))?;
        let predicate = self.term(edge.edge_type.as_str())?;

        let mut triples = vec![Triple::new(source.clone(), predicate.clone(), target.clone())];
        if !self.config.use_reification {
            return Ok(triples);
        }

        let statement = self.edge_iri(edge)?;
        triples.push(Triple::new(statement.clone(), rdf::TYPE, rdf::STATEMENT.into_owned()));
        triples.push(Triple::new(statement.clone(), rdf::SUBJECT, source));
        triples.push(Triple::new(statement.clone(), rdf::PREDICATE, predicate));
        triples.push(Triple::new(statement.clone(), rdf::OBJECT, target));
        triples.push(Triple::new(statement.clone(), self.term("strength")?, double(edge.strength)));
        if let Some(evidence) = &edge.evidence {
            triples.push(Triple::new(
                statement.clone(),
                self.term("evidence")?,
                Literal::new_simple_literal(evidence.as_str()),
            ));
        }
        triples.push(Triple::new(statement, self.term("discoveredAt")?, integer(edge.discovered_at)));
        Ok(triples)
    }

    fn iri(&self, local: &str) -> MirrorResult<NamedNode> {
        let iri = format!("{}{}", self.config.base_iri, local);
        NamedNode::new(iri.as_str()).map_err(|e| MirrorError::InvalidIri(format!("{}: {}", iri, e)))
    }
}

fn string(value: &str) -> Literal {
    Literal::new_simple_literal(value)
}

fn double(value: f64) -> Literal {
    Literal::new_typed_literal(value.to_string(), xsd::DOUBLE)
}

fn integer(value: i64) -> Literal {
    Literal::new_typed_literal(value.to_string(), xsd::INTEGER)
}

/// Attribute values of a vertex as (property, literal) pairs; absent values are skipped
fn attribute_literals(attributes: &VertexAttributes) -> Vec<(&'static str, Literal)> {
    let mut out = Vec::new();
    match attributes {
        VertexAttributes::Initiative(i) => {
            out.push(("name", string(&i.name)));
            if !i.description.is_empty() {
                out.push(("description", string(&i.description)));
            }
            out.push(("startDate", integer(i.start_date)));
            if let Some(end) = i.end_date {
                out.push(("endDate", integer(end)));
            }
            out.push(("department", string(&i.department)));
            if !i.intended_outcome.is_empty() {
                out.push(("intendedOutcome", string(&i.intended_outcome)));
            }
            out.push(("status", string(i.status.as_str())));
            for participant in &i.participants {
                out.push(("participant", string(participant)));
            }
        }
        VertexAttributes::Outcome(o) => {
            out.push(("description", string(&o.description)));
            out.push(("timestamp", integer(o.timestamp)));
            out.push(("outcomeType", string(o.outcome_type.as_str())));
            out.push(("severity", double(o.severity)));
            for employee in &o.affected_employees {
                out.push(("affectedEmployee", string(employee)));
            }
        }
        VertexAttributes::Employee(e) => {
            out.push(("employeeId", string(&e.employee_id)));
            out.push(("department", string(&e.department)));
            if let Some(w) = e.wellness_score {
                out.push(("wellnessScore", double(w)));
            }
            if let Some(g) = e.engagement_level {
                out.push(("engagementLevel", double(g)));
            }
        }
        VertexAttributes::Metric(m) => {
            out.push(("name", string(&m.name)));
            if !m.metric_type.is_empty() {
                out.push(("metricType", string(&m.metric_type)));
            }
            out.push(("value", double(m.value)));
            if let Some(t) = m.target {
                out.push(("target", double(t)));
            }
            out.push(("timestamp", integer(m.timestamp)));
        }
        VertexAttributes::Department(d) => {
            out.push(("name", string(&d.name)));
            out.push((
                "employeeCount",
                Literal::new_typed_literal(d.employee_count.to_string(), xsd::INTEGER),
            ));
            if let Some(s) = d.synergy_index {
                out.push(("synergyIndex", double(s)));
            }
        }
        VertexAttributes::Event(e) => {
            out.push(("name", string(&e.name)));
            if !e.description.is_empty() {
                out.push(("description", string(&e.description)));
            }
            out.push(("timestamp", integer(e.timestamp)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeId, EdgeType, Initiative, Metric, VertexId};

    const BASE: &str = "http://example.org/";

    #[test]
    fn test_mapper_rejects_bad_base() {
        assert!(GraphToRdfMapper::new("not a base").is_err());
        let mapper = GraphToRdfMapper::new(BASE).unwrap();
        assert_eq!(mapper.base_iri(), BASE);
    }

    #[test]
    fn test_vertex_mapping() {
        let mapper = GraphToRdfMapper::new(BASE).unwrap();
        let vertex = Vertex::new(VertexId::new(7), Metric::new("Velocity", 30.0, Some(40.0)).into());
        let triples = mapper.map_vertex(&vertex).unwrap();

        let subject = NamedNode::new("http://example.org/vertex/7").unwrap();
        assert!(triples.contains(&Triple::new(
            subject.clone(),
            rdf::TYPE,
            NamedNode::new("http://example.org/ontology/Metric").unwrap(),
        )));
        assert!(triples.contains(&Triple::new(
            subject.clone(),
            NamedNode::new("http://example.org/ontology/target").unwrap(),
            Literal::new_typed_literal("40", xsd::DOUBLE),
        )));
        // type, name, value, target, timestamp
        assert_eq!(triples.len(), 5);
    }

    #[test]
    fn test_initiative_participants_are_multivalued() {
        let mapper = GraphToRdfMapper::new(BASE).unwrap();
        let initiative = Initiative::new("Pairing", "Eng")
            .with_participant("e1")
            .with_participant("e2");
        let vertex = Vertex::new(VertexId::new(1), initiative.into());
        let participants = mapper
            .map_vertex(&vertex)
            .unwrap()
            .into_iter()
            .filter(|t| t.predicate.as_str() == "http://example.org/ontology/participant")
            .count();
        assert_eq!(participants, 2);
    }

    #[test]
    fn test_edge_mapping_with_reification() {
        let mapper = GraphToRdfMapper::new(BASE).unwrap();
        let edge = Edge::new(
            EdgeId::new(3),
            VertexId::new(1),
            VertexId::new(2),
            EdgeType::Causes,
            0.75,
            Some("retro notes".to_string()),
        );
        let triples = mapper.map_edge(&edge).unwrap();

        assert_eq!(
            triples[0],
            Triple::new(
                NamedNode::new("http://example.org/vertex/1").unwrap(),
                NamedNode::new("http://example.org/ontology/causes").unwrap(),
                NamedNode::new("http://example.org/vertex/2").unwrap(),
            )
        );
        let statement = NamedNode::new("http://example.org/edge/3").unwrap();
        assert!(triples.contains(&Triple::new(statement.clone(), rdf::TYPE, rdf::STATEMENT.into_owned())));
        assert!(triples.contains(&Triple::new(
            statement,
            NamedNode::new("http://example.org/ontology/strength").unwrap(),
            Literal::new_typed_literal("0.75", xsd::DOUBLE),
        )));
        assert_eq!(triples.len(), 8);

        let mut config = MappingConfig::new(BASE);
        config.use_reification = false;
        let plain = GraphToRdfMapper::with_config(config).unwrap();
        assert_eq!(plain.map_edge(&edge).unwrap().len(), 1);
    }
}
