//! Core type definitions for the causal graph

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct VertexId(pub u64);

impl VertexId {
    pub fn new(id: u64) -> Self {
        VertexId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexId({})", self.0)
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        VertexId(id)
    }
}

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        EdgeId(id)
    }
}

/// Kind tag of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum VertexKind {
    Initiative,
    Outcome,
    Employee,
    Metric,
    Department,
    Event,
}

impl VertexKind {
    pub const ALL: [VertexKind; 6] = [
        VertexKind::Initiative,
        VertexKind::Outcome,
        VertexKind::Employee,
        VertexKind::Metric,
        VertexKind::Department,
        VertexKind::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VertexKind::Initiative => "Initiative",
            VertexKind::Outcome => "Outcome",
            VertexKind::Employee => "Employee",
            VertexKind::Metric => "Metric",
            VertexKind::Department => "Department",
            VertexKind::Event => "Event",
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relationship type of an edge
///
/// The set is closed; each type admits a fixed set of endpoint kinds (see [`EdgeType::admits`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Causes,
    Measures,
    ParticipatesIn,
    BelongsTo,
    Influences,
}

impl EdgeType {
    pub const ALL: [EdgeType; 5] = [
        EdgeType::Causes,
        EdgeType::Measures,
        EdgeType::ParticipatesIn,
        EdgeType::BelongsTo,
        EdgeType::Influences,
    ];

    /// Edge types that carry causal meaning (used by theater detection)
    pub const CAUSAL: [EdgeType; 3] = [EdgeType::Causes, EdgeType::Measures, EdgeType::Influences];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Causes => "causes",
            EdgeType::Measures => "measures",
            EdgeType::ParticipatesIn => "participates_in",
            EdgeType::BelongsTo => "belongs_to",
            EdgeType::Influences => "influences",
        }
    }

    pub fn is_causal(&self) -> bool {
        Self::CAUSAL.contains(self)
    }

    /// Whether an edge of this type may connect a `source` vertex to a `target` vertex
    pub fn admits(&self, source: VertexKind, target: VertexKind) -> bool {
        use VertexKind::*;
        match self {
            EdgeType::Causes => {
                matches!(source, Initiative | Event | Metric) && matches!(target, Outcome | Event | Metric)
            }
            EdgeType::Measures => matches!(
                (source, target),
                (Metric, Employee | Department | Outcome) | (Initiative, Metric)
            ),
            EdgeType::ParticipatesIn => source == Employee && matches!(target, Initiative | Event),
            EdgeType::BelongsTo => source == Employee && target == Department,
            EdgeType::Influences => {
                matches!(source, Initiative | Metric) && matches!(target, Employee | Department)
            }
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "causes" => Ok(EdgeType::Causes),
            "measures" => Ok(EdgeType::Measures),
            "participates_in" => Ok(EdgeType::ParticipatesIn),
            "belongs_to" => Ok(EdgeType::BelongsTo),
            "influences" => Ok(EdgeType::Influences),
            other => Err(format!("unknown edge type '{}'", other)),
        }
    }
}
