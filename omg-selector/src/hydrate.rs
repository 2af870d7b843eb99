use std::path::Path;

use omg_core::errors::{OmgError, OmgResult, SelectorError};
use omg_core::model::Node;
use omg_io::{parse_node, read_to_string_opt};

/// Read and parse a node's body from disk by registry file path.
pub fn hydrate_node(root: &Path, id: &str, file_path: &str) -> OmgResult<Node> {
    let content = read_to_string_opt(&root.join(file_path))?.ok_or_else(|| {
        OmgError::Selector(SelectorError::HydrationFailed { id: id.to_string(), reason: "file missing".to_string() })
    })?;
    parse_node(file_path, &content)
}
