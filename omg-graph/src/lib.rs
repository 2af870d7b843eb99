//! # omg-graph
//!
//! Forward/backward adjacency traversal over the registry: neighbors,
//! backlinks, paths, and subgraph BFS (spec.md §4.2). The adjacency
//! cache is rebuild-on-miss, invalidated by entry-count change or an
//! explicit clear.

mod adjacency;
mod cache;
mod neighbors;
mod paths;
mod scoring;
mod subgraph;

pub use adjacency::{build_adjacency, Adjacency};
pub use cache::AdjacencyCache;
pub use neighbors::{get_backlinks, get_neighbors, Direction, ScoredNeighbor};
pub use paths::find_paths;
pub use scoring::{distance_decay, keyword_match, neighbor_score, recency_factor};
pub use subgraph::{get_subgraph, Subgraph};
