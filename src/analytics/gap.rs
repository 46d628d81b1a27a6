//! Intent vs. outcome gap scoring for initiatives

use crate::algo::{traverse, TraversalQuery};
use crate::config::GapConfig;
use crate::graph::{Direction, EdgeType, GraphResult, GraphStore, OutcomeType, Vertex, VertexId, VertexKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Qualitative reading of a gap score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapAnalysis {
    /// Score of at most 50
    Moderate,
    /// Score in (50, 75]
    Significant,
    /// Score above 75
    Severe,
}

impl GapAnalysis {
    pub fn classify(gap_score: f64) -> Self {
        if gap_score > 75.0 {
            GapAnalysis::Severe
        } else if gap_score > 50.0 {
            GapAnalysis::Significant
        } else {
            GapAnalysis::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GapAnalysis::Moderate => "moderate",
            GapAnalysis::Significant => "significant",
            GapAnalysis::Severe => "severe",
        }
    }
}

impl std::fmt::Display for GapAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far an initiative's observed results drifted from what it set out to do
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapReport {
    pub initiative_id: VertexId,
    /// Intended outcomes the initiative directly causes
    pub intended: Vec<Vertex>,
    /// Unintended and emergent outcomes within the configured `causes` depth
    pub actual: Vec<Vertex>,
    /// Measuring metrics that declare a target
    pub metrics: Vec<Vertex>,
    pub avg_metric_gap: f64,
    /// In [0, 100]
    pub gap_score: f64,
    pub analysis: GapAnalysis,
}

/// Score the gap between an initiative's intent and its outcomes.
///
/// ```text
/// gap = clamp(|actual| * w_outcome + avg_metric_gap * w_metric + (no intent ? penalty : 0), 0, 100)
/// ```
///
/// Metrics whose target is zero are listed but do not contribute to the average.
/// Fails with a not-found error unless `initiative` is an Initiative vertex.
pub fn calculate_gap(store: &GraphStore, initiative: VertexId, config: &GapConfig) -> GraphResult<GapReport> {
    store.get_vertex_of_kind(initiative, VertexKind::Initiative)?;

    let intended = distinct(
        store
            .neighbors(initiative, Direction::Outgoing, Some(&[EdgeType::Causes]))
            .into_iter()
            .map(|(_, vertex)| vertex)
            .filter(|vertex| {
                vertex
                    .as_outcome()
                    .map_or(false, |o| o.outcome_type == OutcomeType::Intended)
            }),
    );

    let query = TraversalQuery::new(config.divergent_outcome_depth).along(&[EdgeType::Causes]);
    let actual: Vec<Vertex> = traverse(store, initiative, &query)?
        .into_iter()
        .map(|hit| hit.vertex)
        .filter(|vertex| vertex.as_outcome().map_or(false, |o| o.outcome_type.is_divergent()))
        .collect();

    let metrics = distinct(
        store
            .neighbors(initiative, Direction::Outgoing, Some(&[EdgeType::Measures]))
            .into_iter()
            .map(|(_, vertex)| vertex)
            .filter(|vertex| vertex.as_metric().map_or(false, |m| m.target.is_some())),
    );

    let gaps: Vec<f64> = metrics
        .iter()
        .filter_map(|vertex| vertex.as_metric().and_then(|m| m.relative_gap()))
        .collect();
    let avg_metric_gap = if gaps.is_empty() {
        0.0
    } else {
        gaps.iter().sum::<f64>() / gaps.len() as f64
    };

    let missing_intent = if intended.is_empty() {
        config.missing_intent_penalty
    } else {
        0.0
    };
    let raw = actual.len() as f64 * config.divergent_outcome_weight
        + avg_metric_gap * config.metric_gap_weight
        + missing_intent;
    let gap_score = raw.clamp(0.0, 100.0);
    let analysis = GapAnalysis::classify(gap_score);

    debug!(
        "Gap for initiative {}: {:.2} ({}) from {} divergent outcomes, {} metrics",
        initiative,
        gap_score,
        analysis,
        actual.len(),
        gaps.len()
    );

    Ok(GapReport {
        initiative_id: initiative,
        intended,
        actual,
        metrics,
        avg_metric_gap,
        gap_score,
        analysis,
    })
}

/// Collapse vertices reached over parallel edges, keeping first-seen order
fn distinct<'a>(vertices: impl Iterator<Item = &'a Vertex>) -> Vec<Vertex> {
    let mut seen: IndexMap<VertexId, &Vertex> = IndexMap::new();
    for vertex in vertices {
        seen.entry(vertex.id).or_insert(vertex);
    }
    seen.into_values().cloned().collect()
}
