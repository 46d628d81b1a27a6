//! Department synergy scoring

use crate::graph::{GraphError, GraphResult, GraphStore, InitiativeStatus, VertexId, VertexKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SynergyGrade {
    Siloed,
    Aligned,
    Synergized,
}

impl SynergyGrade {
    /// SYNERGIZED above 80, ALIGNED above 60, SILOED otherwise
    pub fn classify(score: f64) -> Self {
        if score > 80.0 {
            SynergyGrade::Synergized
        } else if score > 60.0 {
            SynergyGrade::Aligned
        } else {
            SynergyGrade::Siloed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SynergyGrade::Siloed => "SILOED",
            SynergyGrade::Aligned => "ALIGNED",
            SynergyGrade::Synergized => "SYNERGIZED",
        }
    }
}

impl std::fmt::Display for SynergyGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynergyReport {
    pub department_id: VertexId,
    pub department: String,
    pub employee_count: usize,
    pub initiative_count: usize,
    pub avg_wellness: f64,
    pub avg_engagement: f64,
    pub completed: usize,
    pub abandoned: usize,
    /// `completed / (completed + abandoned + 1)`
    pub success_ratio: f64,
    pub synergy_score: f64,
    pub grade: SynergyGrade,
}

/// Score how well a department's people and initiatives are doing together.
///
/// Employees and initiatives belong to the department when their `department`
/// field equals its name. Averages skip employees without a score and are 0
/// when nobody has one.
pub fn calculate_synergy(store: &GraphStore, department: VertexId) -> GraphResult<SynergyReport> {
    let vertex = store.get_vertex_of_kind(department, VertexKind::Department)?;
    let name = vertex.display_name();

    let employees: Vec<_> = store
        .vertices_of_kind(VertexKind::Employee)
        .into_iter()
        .filter_map(|v| v.as_employee())
        .filter(|e| e.department == name)
        .collect();
    let initiatives: Vec<_> = store
        .vertices_of_kind(VertexKind::Initiative)
        .into_iter()
        .filter_map(|v| v.as_initiative())
        .filter(|i| i.department == name)
        .collect();

    let avg_wellness = mean(employees.iter().filter_map(|e| e.wellness_score));
    let avg_engagement = mean(employees.iter().filter_map(|e| e.engagement_level));

    let completed = initiatives
        .iter()
        .filter(|i| i.status == InitiativeStatus::Completed)
        .count();
    let abandoned = initiatives
        .iter()
        .filter(|i| i.status == InitiativeStatus::Abandoned)
        .count();
    let success_ratio = completed as f64 / (completed + abandoned + 1) as f64;

    let synergy_score = avg_wellness * 0.3 + avg_engagement * 0.3 + success_ratio * 40.0;
    let grade = SynergyGrade::classify(synergy_score);

    debug!(
        "Synergy for department '{}': {:.2} ({}) over {} employees, {} initiatives",
        name,
        synergy_score,
        grade,
        employees.len(),
        initiatives.len()
    );

    Ok(SynergyReport {
        department_id: department,
        department: name.to_string(),
        employee_count: employees.len(),
        initiative_count: initiatives.len(),
        avg_wellness,
        avg_engagement,
        completed,
        abandoned,
        success_ratio,
        synergy_score,
        grade,
    })
}

/// Compute the synergy score and store it as the department's `synergy_index`
pub fn refresh_synergy_index(store: &mut GraphStore, department: VertexId) -> GraphResult<SynergyReport> {
    let report = calculate_synergy(store, department)?;

    let mut attributes = store
        .get_vertex_of_kind(department, VertexKind::Department)?
        .as_department()
        .cloned()
        .ok_or(GraphError::VertexNotFound(department))?;
    attributes.synergy_index = Some(report.synergy_score);
    store.update_vertex(department, attributes)?;

    info!(
        "Refreshed synergy index of '{}' to {:.2}",
        report.department, report.synergy_score
    );
    Ok(report)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Department, Employee, Initiative};

    fn scenario() -> (GraphStore, VertexId) {
        let mut store = GraphStore::new();
        let d = store.add_vertex(Department::new("D")).unwrap();
        store
            .add_vertex(Employee::new("E1", "D").with_scores(Some(80.0), Some(75.0)))
            .unwrap();
        store
            .add_vertex(Employee::new("E2", "D").with_scores(Some(70.0), Some(65.0)))
            .unwrap();
        store
            .add_vertex(Initiative::new("Shipped", "D").with_status(InitiativeStatus::Completed))
            .unwrap();
        store
            .add_vertex(Initiative::new("Dropped", "D").with_status(InitiativeStatus::Abandoned))
            .unwrap();
        // Another department's people do not count
        store
            .add_vertex(Employee::new("X1", "Other").with_scores(Some(0.0), Some(0.0)))
            .unwrap();
        (store, d)
    }

    #[test]
    fn test_synergy_scenario() {
        let (store, d) = scenario();
        let report = calculate_synergy(&store, d).unwrap();

        assert_eq!(report.employee_count, 2);
        assert_eq!(report.initiative_count, 2);
        assert_eq!(report.avg_wellness, 75.0);
        assert_eq!(report.avg_engagement, 70.0);
        assert!((report.success_ratio - 1.0 / 3.0).abs() < 1e-12);
        assert!((report.synergy_score - 56.8333).abs() < 1e-3);
        assert_eq!(report.grade, SynergyGrade::Siloed);
    }

    #[test]
    fn test_undefined_scores_are_skipped() {
        let mut store = GraphStore::new();
        let d = store.add_vertex(Department::new("Research")).unwrap();
        store
            .add_vertex(Employee::new("R1", "Research").with_scores(Some(90.0), None))
            .unwrap();
        store.add_vertex(Employee::new("R2", "Research")).unwrap();

        let report = calculate_synergy(&store, d).unwrap();
        assert_eq!(report.employee_count, 2);
        assert_eq!(report.avg_wellness, 90.0);
        assert_eq!(report.avg_engagement, 0.0);
        assert_eq!(report.success_ratio, 0.0);
        assert!((report.synergy_score - 27.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_department_is_neutral() {
        let mut store = GraphStore::new();
        let d = store.add_vertex(Department::new("Empty")).unwrap();
        let report = calculate_synergy(&store, d).unwrap();
        assert_eq!(report.synergy_score, 0.0);
        assert_eq!(report.grade, SynergyGrade::Siloed);
    }

    #[test]
    fn test_grades() {
        assert_eq!(SynergyGrade::classify(80.0), SynergyGrade::Aligned);
        assert_eq!(SynergyGrade::classify(80.5), SynergyGrade::Synergized);
        assert_eq!(SynergyGrade::classify(60.0), SynergyGrade::Siloed);
        assert_eq!(SynergyGrade::classify(60.5), SynergyGrade::Aligned);
    }

    #[test]
    fn test_requires_department() {
        let (store, _) = scenario();
        let employee = VertexId::new(2);
        assert!(calculate_synergy(&store, employee).unwrap_err().is_not_found());
        assert_eq!(
            calculate_synergy(&store, VertexId::new(99)).unwrap_err(),
            GraphError::VertexNotFound(VertexId::new(99))
        );
    }

    #[test]
    fn test_refresh_synergy_index() {
        let (mut store, d) = scenario();
        let report = refresh_synergy_index(&mut store, d).unwrap();

        let department = store.get_vertex(d).unwrap().as_department().unwrap();
        assert_eq!(department.synergy_index, Some(report.synergy_score));
        assert_eq!(department.name, "D");

        // Refreshing again is stable
        let again = refresh_synergy_index(&mut store, d).unwrap();
        assert_eq!(again, report);
    }
}
