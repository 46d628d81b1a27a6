use orgcausal::graph::{Direction, EdgeType, Event, Initiative, Metric, Outcome, OutcomeType, VertexId};
use orgcausal::{CausalEngine, GraphError, PathQuery, TraversalQuery};

fn chain(engine: &CausalEngine) -> (VertexId, VertexId, VertexId) {
    let a = engine.create_vertex(Initiative::new("A", "Ops")).unwrap();
    let b = engine.create_vertex(Event::new("B")).unwrap();
    let c = engine
        .create_vertex(Outcome::new("C", OutcomeType::Unintended, 4.0))
        .unwrap();
    (a, b, c)
}

#[test]
fn test_path_strength_is_a_product() {
    let engine = CausalEngine::default();
    let (a, b, c) = chain(&engine);
    engine.create_edge(EdgeType::Causes, a, b, 0.8, None).unwrap();
    engine.create_edge(EdgeType::Causes, b, c, 0.5, None).unwrap();

    let paths = engine.find_paths(a, c, &PathQuery::new(3)).unwrap();
    assert_eq!(paths.len(), 1);
    assert!((paths[0].strength - 0.4).abs() < 1e-12);
    assert_eq!(paths[0].length, 3);
    assert_eq!(paths[0].vertices, vec![a, b, c]);
}

#[test]
fn test_cycle_terminates_with_distinct_vertices() {
    // B <-> C through events, which may cause each other
    let engine = CausalEngine::default();
    let a = engine.create_vertex(Initiative::new("A", "Ops")).unwrap();
    let b = engine.create_vertex(Event::new("B")).unwrap();
    let c = engine.create_vertex(Event::new("C")).unwrap();
    engine.create_edge(EdgeType::Causes, a, b, 0.9, None).unwrap();
    engine.create_edge(EdgeType::Causes, b, c, 0.9, None).unwrap();
    engine.create_edge(EdgeType::Causes, c, b, 0.9, None).unwrap();

    let hits = engine.traverse(b, &TraversalQuery::new(3)).unwrap();
    let ids: Vec<_> = hits.iter().map(|h| h.vertex.id).collect();
    assert_eq!(ids, vec![c]);

    let hits = engine
        .traverse(a, &TraversalQuery::new(10).direction(Direction::Both))
        .unwrap();
    let depths: Vec<_> = hits.iter().map(|h| (h.vertex.id, h.depth)).collect();
    assert_eq!(depths, vec![(b, 1), (c, 2)]);

    // Paths never revisit a vertex
    let paths = engine.find_paths(a, c, &PathQuery::new(10)).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].vertices, vec![a, b, c]);
}

#[test]
fn test_depth_limit_and_direction() {
    let engine = CausalEngine::default();
    let (a, b, c) = chain(&engine);
    engine.create_edge(EdgeType::Causes, a, b, 0.8, None).unwrap();
    engine.create_edge(EdgeType::Causes, b, c, 0.5, None).unwrap();

    assert_eq!(engine.traverse(a, &TraversalQuery::new(1)).unwrap().len(), 1);
    assert_eq!(engine.traverse(a, &TraversalQuery::new(2)).unwrap().len(), 2);
    assert!(engine.traverse(c, &TraversalQuery::new(5)).unwrap().is_empty());

    let upstream = engine
        .traverse(c, &TraversalQuery::new(5).direction(Direction::Incoming))
        .unwrap();
    let ids: Vec<_> = upstream.iter().map(|h| h.vertex.id).collect();
    assert_eq!(ids, vec![b, a]);

    assert!(engine.find_paths(a, c, &PathQuery::new(1)).unwrap().is_empty());
    assert!(engine.find_paths(a, a, &PathQuery::new(4)).unwrap().is_empty());
}

#[test]
fn test_parallel_edges_are_distinct_paths() {
    let engine = CausalEngine::default();
    let (a, b, _) = chain(&engine);
    let weak = engine
        .create_edge(EdgeType::Causes, a, b, 0.2, Some("survey".into()))
        .unwrap();
    let strong = engine
        .create_edge(EdgeType::Causes, a, b, 0.9, Some("telemetry".into()))
        .unwrap();

    let paths = engine.find_paths(a, b, &PathQuery::new(1)).unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].edges, vec![strong]);
    assert_eq!(paths[1].edges, vec![weak]);

    let best = engine.strongest_path(a, b, &PathQuery::new(1)).unwrap().unwrap();
    assert_eq!(best.edges, vec![strong]);
}

#[test]
fn test_path_cap() {
    // Fan of five parallel routes A -> Mi -> O
    let engine = CausalEngine::default();
    let a = engine.create_vertex(Initiative::new("A", "Ops")).unwrap();
    let o = engine
        .create_vertex(Outcome::new("O", OutcomeType::Intended, 1.0))
        .unwrap();
    for n in 0..5 {
        let m = engine
            .create_vertex(Metric::new(format!("M{}", n), 1.0, None))
            .unwrap();
        engine.create_edge(EdgeType::Measures, a, m, 0.5, None).unwrap();
        engine.create_edge(EdgeType::Causes, m, o, 0.5, None).unwrap();
    }

    assert_eq!(engine.find_paths(a, o, &PathQuery::new(2)).unwrap().len(), 5);
    assert_eq!(
        engine
            .find_paths(a, o, &PathQuery::new(2).max_paths(3))
            .unwrap()
            .len(),
        3
    );
    assert!(engine
        .find_paths(a, o, &PathQuery::new(2).along(&[EdgeType::Causes]))
        .unwrap()
        .is_empty());
}

#[test]
fn test_strongest_path_prefers_product_over_hops() {
    // Direct A -> C at 0.3 vs A -> B -> C at 0.9 * 0.9
    let engine = CausalEngine::default();
    let (a, b, c) = chain(&engine);
    engine.create_edge(EdgeType::Causes, a, c, 0.3, None).unwrap();
    engine.create_edge(EdgeType::Causes, a, b, 0.9, None).unwrap();
    engine.create_edge(EdgeType::Causes, b, c, 0.9, None).unwrap();

    let best = engine.strongest_path(a, c, &PathQuery::new(3)).unwrap().unwrap();
    assert_eq!(best.vertices, vec![a, b, c]);
    assert!((best.strength - 0.81).abs() < 1e-12);

    // With one hop allowed only the direct edge remains
    let best = engine.strongest_path(a, c, &PathQuery::new(1)).unwrap().unwrap();
    assert_eq!(best.vertices, vec![a, c]);
}

#[test]
fn test_outcome_filter() {
    let engine = CausalEngine::default();
    let (a, b, c) = chain(&engine);
    let good = engine
        .create_vertex(Outcome::new("Good", OutcomeType::Intended, 1.0))
        .unwrap();
    engine.create_edge(EdgeType::Causes, a, b, 0.8, None).unwrap();
    engine.create_edge(EdgeType::Causes, b, c, 0.5, None).unwrap();
    engine.create_edge(EdgeType::Causes, a, good, 0.5, None).unwrap();

    let unintended = engine
        .traverse(a, &TraversalQuery::new(2).outcome_type(OutcomeType::Unintended))
        .unwrap();
    assert_eq!(unintended.len(), 1);
    assert_eq!(unintended[0].vertex.id, c);

    let intended = engine
        .traverse(a, &TraversalQuery::new(2).outcome_type(OutcomeType::Intended))
        .unwrap();
    assert_eq!(intended.len(), 1);
    assert_eq!(intended[0].vertex.id, good);
}

#[test]
fn test_unknown_endpoints() {
    let engine = CausalEngine::default();
    let (a, _, _) = chain(&engine);
    let ghost = VertexId::new(77);

    assert_eq!(
        engine.traverse(ghost, &TraversalQuery::new(2)),
        Err(GraphError::VertexNotFound(ghost))
    );
    assert_eq!(
        engine.find_paths(a, ghost, &PathQuery::new(2)),
        Err(GraphError::VertexNotFound(ghost))
    );
    assert!(engine.neighbors(ghost, Direction::Both, None).unwrap().is_empty());
}
