/// Graph traversal errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("traversal depth exceeded: max {max_depth}, requested {requested}")]
    DepthExceeded { max_depth: usize, requested: usize },

    #[error("node cap exceeded during subgraph BFS: cap {cap}")]
    NodeCapExceeded { cap: usize },

    #[error("unknown seed node '{id}' for traversal")]
    UnknownSeed { id: String },
}
