//! Metric auditing: gameable metrics and metric theater
//!
//! The two checks use independent predicates. A metric far off its target can
//! still be causally tied to an initiative, and an untied metric can sit right
//! on target.

use crate::algo::{build_view, reaches_any};
use crate::graph::{Direction, EdgeType, GraphError, GraphResult, GraphStore, VertexId, VertexKind};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Score recorded for every metric with no initiative behind it
pub const THEATER_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuspicionLevel {
    Moderate,
    High,
    Extreme,
}

impl SuspicionLevel {
    /// EXTREME above 0.9, HIGH above 0.7, MODERATE otherwise
    pub fn classify(gap: f64) -> Self {
        if gap > 0.9 {
            SuspicionLevel::Extreme
        } else if gap > 0.7 {
            SuspicionLevel::High
        } else {
            SuspicionLevel::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuspicionLevel::Moderate => "MODERATE",
            SuspicionLevel::High => "HIGH",
            SuspicionLevel::Extreme => "EXTREME",
        }
    }
}

impl std::fmt::Display for SuspicionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric whose value strays from its target by more than the threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameableMetric {
    pub metric_id: VertexId,
    pub name: String,
    pub value: f64,
    pub target: f64,
    /// `|value - target| / target`
    pub gap: f64,
    pub suspicion_level: SuspicionLevel,
}

/// A metric that no initiative is causally connected to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheaterMetric {
    pub metric_id: VertexId,
    pub name: String,
    pub theater_score: f64,
}

/// Metrics whose relative gap to target exceeds `threshold`.
///
/// Metrics without a target or with a zero target are skipped. The result is
/// sorted by gap, largest first, then by metric id.
pub fn find_gameable_metrics(store: &GraphStore, threshold: f64) -> GraphResult<Vec<GameableMetric>> {
    if !threshold.is_finite() {
        return Err(GraphError::validation("threshold", "must be a finite number"));
    }

    let mut found: Vec<GameableMetric> = store
        .vertices_of_kind(VertexKind::Metric)
        .into_iter()
        .filter_map(|vertex| {
            let metric = vertex.as_metric()?;
            let gap = metric.relative_gap()?;
            let target = metric.target?;
            (gap > threshold).then(|| GameableMetric {
                metric_id: vertex.id,
                name: metric.name.clone(),
                value: metric.value,
                target,
                gap,
                suspicion_level: SuspicionLevel::classify(gap),
            })
        })
        .collect();

    found.sort_by(|a, b| b.gap.total_cmp(&a.gap).then_with(|| a.metric_id.cmp(&b.metric_id)));

    debug!("{} gameable metrics above threshold {}", found.len(), threshold);
    Ok(found)
}

/// Metrics with no Initiative within `max_depth` undirected hops over the
/// causal edge types (`causes`, `measures`, `influences`).
///
/// Metrics are checked in parallel against a single view of the graph; the
/// result is ordered by metric id.
pub fn detect_theater_metrics(store: &GraphStore, max_depth: usize) -> Vec<TheaterMetric> {
    let view = build_view(store, Some(&EdgeType::CAUSAL));
    let initiatives: FxHashSet<u64> = store
        .vertices_of_kind(VertexKind::Initiative)
        .into_iter()
        .map(|v| v.id.as_u64())
        .collect();
    let metrics = store.vertices_of_kind(VertexKind::Metric);
    let checked = metrics.len();

    let mut theater: Vec<TheaterMetric> = metrics
        .par_iter()
        .filter(|vertex| {
            !reaches_any(&view, vertex.id.as_u64(), max_depth, Direction::Both, |node| {
                initiatives.contains(&node)
            })
        })
        .map(|vertex| TheaterMetric {
            metric_id: vertex.id,
            name: vertex.display_name().to_string(),
            theater_score: THEATER_SCORE,
        })
        .collect();

    theater.sort_by_key(|m| m.metric_id);

    info!("Theater check: {} of {} metrics unconnected to any initiative", theater.len(), checked);
    theater
}
