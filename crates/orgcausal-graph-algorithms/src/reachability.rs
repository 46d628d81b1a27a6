//! Depth-bounded reachability
//!
//! Breadth-first expansion with a single visited set: every node is reported once,
//! at the smallest hop count that reaches it, and the walk stops at `max_depth`
//! so cycles cannot keep it alive.

use super::common::{Direction, GraphView, NodeId};
use std::collections::VecDeque;

/// A node found by a bounded search, with the minimal number of hops to reach it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reached {
    pub node: NodeId,
    pub depth: usize,
}

/// All nodes reachable from `source` within `max_depth` hops.
///
/// The source itself is not reported. Order is breadth-first: by depth, then by the
/// adjacency order of the view. Returns an empty list when `source` is not in the view.
pub fn bounded_reach(
    view: &GraphView,
    source: NodeId,
    max_depth: usize,
    direction: Direction,
) -> Vec<Reached> {
    let mut reached = Vec::new();
    walk(view, source, max_depth, direction, |node, depth| {
        reached.push(Reached { node, depth });
        false
    });
    reached
}

/// Whether any node satisfying `predicate` is reachable within `max_depth` hops.
///
/// Stops at the first match.
pub fn reaches_any<F>(
    view: &GraphView,
    source: NodeId,
    max_depth: usize,
    direction: Direction,
    mut predicate: F,
) -> bool
where
    F: FnMut(NodeId) -> bool,
{
    walk(view, source, max_depth, direction, |node, _| predicate(node))
}

/// Breadth-first walk; `visit` returns true to stop early. Returns whether it stopped early.
fn walk<F>(view: &GraphView, source: NodeId, max_depth: usize, direction: Direction, mut visit: F) -> bool
where
    F: FnMut(NodeId, usize) -> bool,
{
    let Some(source_idx) = view.index_of(source) else {
        return false;
    };

    let mut visited = vec![false; view.node_count];
    let mut queue = VecDeque::new();

    visited[source_idx] = true;
    queue.push_back((source_idx, 0usize));

    while let Some((current_idx, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for next in view.adjacent(current_idx, direction) {
            if visited[next.index] {
                continue;
            }
            visited[next.index] = true;

            if visit(view.index_to_node[next.index], depth + 1) {
                return true;
            }
            queue.push_back((next.index, depth + 1));
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::view_from_edges;

    #[test]
    fn test_bounded_reach_depths() {
        // 1->2->3->4
        let view = view_from_edges(4, &[(1, 2, 1, 1.0), (2, 3, 2, 1.0), (3, 4, 3, 1.0)]);

        let reached = bounded_reach(&view, 1, 2, Direction::Outgoing);
        assert_eq!(
            reached,
            vec![Reached { node: 2, depth: 1 }, Reached { node: 3, depth: 2 }]
        );

        assert!(bounded_reach(&view, 1, 0, Direction::Outgoing).is_empty());
    }

    #[test]
    fn test_cycle_terminates_and_dedups() {
        // 1->2->1 and 2->3
        let view = view_from_edges(3, &[(1, 2, 1, 0.5), (2, 1, 2, 0.5), (2, 3, 3, 0.5)]);

        let reached = bounded_reach(&view, 1, 3, Direction::Outgoing);
        let nodes: Vec<_> = reached.iter().map(|r| r.node).collect();
        assert_eq!(nodes, vec![2, 3]);
    }

    #[test]
    fn test_diamond_reports_once_at_min_depth() {
        // 1->2->4, 1->3->4, 1->4
        let view = view_from_edges(
            4,
            &[(1, 2, 1, 1.0), (1, 3, 2, 1.0), (2, 4, 3, 1.0), (3, 4, 4, 1.0), (1, 4, 5, 1.0)],
        );

        let reached = bounded_reach(&view, 1, 5, Direction::Outgoing);
        assert_eq!(reached.len(), 3);
        assert!(reached.contains(&Reached { node: 4, depth: 1 }));
    }

    #[test]
    fn test_incoming_and_both() {
        // 1->2, 3->2
        let view = view_from_edges(3, &[(1, 2, 1, 1.0), (3, 2, 2, 1.0)]);

        assert!(bounded_reach(&view, 1, 2, Direction::Incoming).is_empty());

        let nodes: Vec<_> = bounded_reach(&view, 1, 2, Direction::Both)
            .iter()
            .map(|r| r.node)
            .collect();
        assert_eq!(nodes, vec![2, 3]);
    }

    #[test]
    fn test_reaches_any_stops_early() {
        let view = view_from_edges(4, &[(1, 2, 1, 1.0), (2, 3, 2, 1.0), (3, 4, 3, 1.0)]);

        let mut seen = Vec::new();
        let found = reaches_any(&view, 1, 5, Direction::Outgoing, |n| {
            seen.push(n);
            n == 3
        });
        assert!(found);
        assert_eq!(seen, vec![2, 3]);

        assert!(!reaches_any(&view, 1, 1, Direction::Outgoing, |n| n == 3));
        assert!(!reaches_any(&view, 99, 5, Direction::Outgoing, |_| true));
    }
}
