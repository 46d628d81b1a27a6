use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orgcausal::algo::{find_paths, traverse, PathQuery, TraversalQuery};
use orgcausal::analytics::{calculate_gap, calculate_synergy, detect_theater_metrics, find_gameable_metrics};
use orgcausal::config::GapConfig;
use orgcausal::graph::{
    Department, EdgeType, Employee, Event, GraphStore, Initiative, InitiativeStatus, Metric, Outcome, OutcomeType,
    VertexId,
};

struct Org {
    store: GraphStore,
    initiatives: Vec<VertexId>,
    departments: Vec<VertexId>,
}

/// `size` initiatives over ten departments; each initiative causes two outcomes
/// and an event, is measured by one metric, and the event feeds the next initiative's metric.
fn build_org(size: usize) -> Org {
    let mut store = GraphStore::new();
    let mut initiatives = Vec::with_capacity(size);
    let mut departments = Vec::new();
    let mut metrics = Vec::with_capacity(size);
    let mut events = Vec::with_capacity(size);

    for d in 0..10 {
        departments.push(store.add_vertex(Department::new(format!("Dept{}", d))).unwrap());
    }

    for i in 0..size {
        let department = format!("Dept{}", i % 10);
        let status = match i % 3 {
            0 => InitiativeStatus::Completed,
            1 => InitiativeStatus::Abandoned,
            _ => InitiativeStatus::Active,
        };
        let initiative = store
            .add_vertex(Initiative::new(format!("Initiative{}", i), department.clone()).with_status(status))
            .unwrap();
        let intended = store
            .add_vertex(Outcome::new(format!("Intended{}", i), OutcomeType::Intended, 2.0))
            .unwrap();
        let side_effect = store
            .add_vertex(Outcome::new(format!("SideEffect{}", i), OutcomeType::Unintended, 5.0))
            .unwrap();
        let event = store.add_vertex(Event::new(format!("Event{}", i))).unwrap();
        let metric = store
            .add_vertex(Metric::new(format!("Metric{}", i), (i % 100) as f64, Some(50.0)))
            .unwrap();
        store
            .add_vertex(
                Employee::new(format!("e-{}", i), department)
                    .with_scores(Some((i % 100) as f64), Some(((i * 7) % 100) as f64)),
            )
            .unwrap();

        store.add_edge(EdgeType::Causes, initiative, intended, 0.8, None).unwrap();
        store.add_edge(EdgeType::Causes, initiative, side_effect, 0.4, None).unwrap();
        store.add_edge(EdgeType::Causes, initiative, event, 0.6, None).unwrap();
        store.add_edge(EdgeType::Measures, initiative, metric, 1.0, None).unwrap();

        initiatives.push(initiative);
        metrics.push(metric);
        events.push(event);
    }

    for i in 1..size {
        store.add_edge(EdgeType::Causes, events[i - 1], metrics[i], 0.5, None).unwrap();
    }

    // Unlinked metrics for theater detection to find
    for i in 0..size / 10 {
        store.add_vertex(Metric::new(format!("Vanity{}", i), 99.0, Some(100.0))).unwrap();
    }

    Org {
        store,
        initiatives,
        departments,
    }
}

/// Benchmark gap scoring of a single initiative
fn bench_gap(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap");
    let config = GapConfig::default();

    for size in [100, 1000, 10_000].iter() {
        let org = build_org(*size);
        let initiative = org.initiatives[size / 2];
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(calculate_gap(&org.store, initiative, &config).unwrap()));
        });
    }
    group.finish();
}

/// Benchmark the whole-graph metric audits
fn bench_audit(c: &mut Criterion) {
    let mut group = c.benchmark_group("audit");

    for size in [100, 1000, 10_000].iter() {
        let org = build_org(*size);
        group.bench_with_input(BenchmarkId::new("gameable", size), size, |b, _| {
            b.iter(|| black_box(find_gameable_metrics(&org.store, 0.5).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("theater", size), size, |b, _| {
            b.iter(|| black_box(detect_theater_metrics(&org.store, 2)));
        });
    }
    group.finish();
}

/// Benchmark traversal and path enumeration along the event chain
fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");
    let org = build_org(1000);
    let from = org.initiatives[0];
    let to = org.initiatives[1];

    group.bench_function("traverse_3_hop", |b| {
        let query = TraversalQuery::new(3);
        b.iter(|| black_box(traverse(&org.store, from, &query).unwrap()));
    });

    group.bench_function("find_paths_both_4_hop", |b| {
        let query = PathQuery::new(4)
            .direction(orgcausal::graph::Direction::Both)
            .max_paths(1000);
        b.iter(|| black_box(find_paths(&org.store, from, to, &query).unwrap()));
    });
    group.finish();
}

/// Benchmark department synergy
fn bench_synergy(c: &mut Criterion) {
    let mut group = c.benchmark_group("synergy");

    for size in [100, 1000, 10_000].iter() {
        let org = build_org(*size);
        let department = org.departments[0];
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(calculate_synergy(&org.store, department).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gap, bench_audit, bench_paths, bench_synergy);
criterion_main!(benches);
