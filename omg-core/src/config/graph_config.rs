use serde::{Deserialize, Serialize};

use super::defaults;

/// Graph traversal tuning (spec.md §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum `depth` accepted by `getNeighbors` (spec allows 1 or 2).
    pub max_depth: usize,
    /// Node cap for `getSubgraph` BFS.
    pub subgraph_max_nodes: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_depth: defaults::DEFAULT_TRAVERSAL_MAX_DEPTH,
            subgraph_max_nodes: defaults::DEFAULT_SUBGRAPH_MAX_NODES,
        }
    }
}
