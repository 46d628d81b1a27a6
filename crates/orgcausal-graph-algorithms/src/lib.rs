pub mod common;
pub mod pathfinding;
pub mod reachability;

pub use common::{Adjacent, AdjacencyEntry, Direction, EdgeId, GraphView, NodeId};
pub use pathfinding::{all_simple_paths, strongest_path, PathSearch, PathSet, WeightedPath};
pub use reachability::{bounded_reach, reaches_any, Reached};
