//! Organizational analytics over the causal graph
//!
//! - [`gap`]: how far an initiative drifted from its intent
//! - [`audit`]: gameable metrics and metric theater
//! - [`synergy`]: department-level wellbeing and delivery
//!
//! Every scorer is a pure read over a `GraphStore`; the caller decides what
//! consistency the store reference represents.

pub mod audit;
pub mod gap;
pub mod synergy;

pub use audit::{
    detect_theater_metrics, find_gameable_metrics, GameableMetric, SuspicionLevel, TheaterMetric, THEATER_SCORE,
};
pub use gap::{calculate_gap, GapAnalysis, GapReport};
pub use synergy::{calculate_synergy, refresh_synergy_index, SynergyGrade, SynergyReport};
