//! Vertex implementation for the causal graph
//!
//! A vertex is a tagged union over the organizational entity kinds. Attribute
//! access goes through exhaustive matches on [`VertexAttributes`], so adding a
//! kind is a compile error everywhere it matters.

use super::store::{GraphError, GraphResult};
use super::types::{VertexId, VertexKind};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeStatus {
    Planned,
    Active,
    Completed,
    Abandoned,
}

impl InitiativeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitiativeStatus::Planned => "planned",
            InitiativeStatus::Active => "active",
            InitiativeStatus::Completed => "completed",
            InitiativeStatus::Abandoned => "abandoned",
        }
    }
}

/// How an outcome relates to what was planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    Intended,
    Unintended,
    Emergent,
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::Intended => "intended",
            OutcomeType::Unintended => "unintended",
            OutcomeType::Emergent => "emergent",
        }
    }

    /// Outcomes that were not asked for
    pub fn is_divergent(&self) -> bool {
        matches!(self, OutcomeType::Unintended | OutcomeType::Emergent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initiative {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unix milliseconds
    pub start_date: i64,
    #[serde(default)]
    pub end_date: Option<i64>,
    /// Name of the owning department
    pub department: String,
    #[serde(default)]
    pub intended_outcome: String,
    pub status: InitiativeStatus,
    /// Employee identifiers, unique, in insertion order
    #[serde(default)]
    pub participants: IndexSet<String>,
}

impl Initiative {
    pub fn new(name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            start_date: now_millis(),
            end_date: None,
            department: department.into(),
            intended_outcome: String::new(),
            status: InitiativeStatus::Planned,
            participants: IndexSet::new(),
        }
    }

    pub fn with_status(mut self, status: InitiativeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_intended_outcome(mut self, intended_outcome: impl Into<String>) -> Self {
        self.intended_outcome = intended_outcome.into();
        self
    }

    /// Adds a participant; duplicates are ignored
    pub fn with_participant(mut self, employee_id: impl Into<String>) -> Self {
        self.participants.insert(employee_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub description: String,
    /// Unix milliseconds
    pub timestamp: i64,
    pub outcome_type: OutcomeType,
    /// 0 (negligible) to 10 (critical)
    pub severity: f64,
    #[serde(default)]
    pub affected_employees: IndexSet<String>,
}

impl Outcome {
    pub fn new(description: impl Into<String>, outcome_type: OutcomeType, severity: f64) -> Self {
        Self {
            description: description.into(),
            timestamp: now_millis(),
            outcome_type,
            severity,
            affected_employees: IndexSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    /// Name of the department the employee works in
    pub department: String,
    /// 0-100
    #[serde(default)]
    pub wellness_score: Option<f64>,
    /// 0-100
    #[serde(default)]
    pub engagement_level: Option<f64>,
}

impl Employee {
    pub fn new(employee_id: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            department: department.into(),
            wellness_score: None,
            engagement_level: None,
        }
    }

    pub fn with_scores(mut self, wellness: Option<f64>, engagement: Option<f64>) -> Self {
        self.wellness_score = wellness;
        self.engagement_level = engagement;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(default)]
    pub metric_type: String,
    pub value: f64,
    #[serde(default)]
    pub target: Option<f64>,
    /// Unix milliseconds
    pub timestamp: i64,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: f64, target: Option<f64>) -> Self {
        Self {
            name: name.into(),
            metric_type: String::new(),
            value,
            target,
            timestamp: now_millis(),
        }
    }

    /// Relative deviation from target, `|value - target| / target`.
    ///
    /// `None` without a target or when the target is zero.
    pub fn relative_gap(&self) -> Option<f64> {
        match self.target {
            Some(target) if target != 0.0 => Some((self.value - target).abs() / target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    #[serde(default)]
    pub employee_count: u64,
    #[serde(default)]
    pub synergy_index: Option<f64>,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            employee_count: 0,
            synergy_index: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unix milliseconds
    pub timestamp: i64,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            timestamp: now_millis(),
        }
    }
}

/// Kind-specific attribute record of a vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VertexAttributes {
    Initiative(Initiative),
    Outcome(Outcome),
    Employee(Employee),
    Metric(Metric),
    Department(Department),
    Event(Event),
}

impl VertexAttributes {
    pub fn kind(&self) -> VertexKind {
        match self {
            VertexAttributes::Initiative(_) => VertexKind::Initiative,
            VertexAttributes::Outcome(_) => VertexKind::Outcome,
            VertexAttributes::Employee(_) => VertexKind::Employee,
            VertexAttributes::Metric(_) => VertexKind::Metric,
            VertexAttributes::Department(_) => VertexKind::Department,
            VertexAttributes::Event(_) => VertexKind::Event,
        }
    }

    /// Human-readable label for reports
    pub fn display_name(&self) -> &str {
        match self {
            VertexAttributes::Initiative(i) => &i.name,
            VertexAttributes::Outcome(o) => &o.description,
            VertexAttributes::Employee(e) => &e.employee_id,
            VertexAttributes::Metric(m) => &m.name,
            VertexAttributes::Department(d) => &d.name,
            VertexAttributes::Event(e) => &e.name,
        }
    }

    /// Check declared attribute ranges
    pub fn validate(&self) -> GraphResult<()> {
        match self {
            VertexAttributes::Initiative(i) => {
                require_non_empty("initiative.name", &i.name)?;
                if let Some(end) = i.end_date {
                    if end < i.start_date {
                        return Err(GraphError::validation(
                            "initiative.end_date",
                            "ends before it starts",
                        ));
                    }
                }
                Ok(())
            }
            VertexAttributes::Outcome(o) => require_range("outcome.severity", o.severity, 0.0, 10.0),
            VertexAttributes::Employee(e) => {
                require_non_empty("employee.employee_id", &e.employee_id)?;
                if let Some(w) = e.wellness_score {
                    require_range("employee.wellness_score", w, 0.0, 100.0)?;
                }
                if let Some(g) = e.engagement_level {
                    require_range("employee.engagement_level", g, 0.0, 100.0)?;
                }
                Ok(())
            }
            VertexAttributes::Metric(m) => {
                require_non_empty("metric.name", &m.name)?;
                require_finite("metric.value", m.value)?;
                if let Some(t) = m.target {
                    require_finite("metric.target", t)?;
                }
                Ok(())
            }
            VertexAttributes::Department(d) => {
                require_non_empty("department.name", &d.name)?;
                if let Some(s) = d.synergy_index {
                    require_finite("department.synergy_index", s)?;
                }
                Ok(())
            }
            VertexAttributes::Event(e) => require_non_empty("event.name", &e.name),
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> GraphResult<()> {
    if value.trim().is_empty() {
        return Err(GraphError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> GraphResult<()> {
    if !value.is_finite() {
        return Err(GraphError::validation(field, format!("{} is not a finite number", value)));
    }
    Ok(())
}

fn require_range(field: &str, value: f64, min: f64, max: f64) -> GraphResult<()> {
    // NaN fails both comparisons and is rejected here too
    if !(value >= min && value <= max) {
        return Err(GraphError::validation(
            field,
            format!("{} is outside [{}, {}]", value, min, max),
        ));
    }
    Ok(())
}

/// A vertex in the causal graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique identifier, assigned by the store
    pub id: VertexId,

    /// Kind-specific attributes
    pub attributes: VertexAttributes,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Vertex {
    pub fn new(id: VertexId, attributes: VertexAttributes) -> Self {
        let now = now_millis();
        Vertex {
            id,
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> VertexKind {
        self.attributes.kind()
    }

    pub fn display_name(&self) -> &str {
        self.attributes.display_name()
    }

    pub fn as_initiative(&self) -> Option<&Initiative> {
        match &self.attributes {
            VertexAttributes::Initiative(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_outcome(&self) -> Option<&Outcome> {
        match &self.attributes {
            VertexAttributes::Outcome(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_employee(&self) -> Option<&Employee> {
        match &self.attributes {
            VertexAttributes::Employee(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_metric(&self) -> Option<&Metric> {
        match &self.attributes {
            VertexAttributes::Metric(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_department(&self) -> Option<&Department> {
        match &self.attributes {
            VertexAttributes::Department(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match &self.attributes {
            VertexAttributes::Event(e) => Some(e),
            _ => None,
        }
    }

    /// Replace the attribute record wholesale
    pub(crate) fn replace_attributes(&mut self, attributes: VertexAttributes) {
        self.attributes = attributes;
        self.updated_at = now_millis();
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

macro_rules! impl_from_attributes {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for VertexAttributes {
                fn from(value: $variant) -> Self {
                    VertexAttributes::$variant(value)
                }
            }
        )*
    };
}

impl_from_attributes!(Initiative, Outcome, Employee, Metric, Department, Event);
