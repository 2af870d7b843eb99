use omg_core::model::NodeType;

/// Lowercase, collapse any run of non-alphanumeric characters to a single
/// `-`, and trim leading/trailing dashes. Used to derive the deterministic
/// slug an upsert's `id`/`filePath` are built from (spec.md §3).
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_dash = false;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && !out.is_empty() {
            out.push('-');
            last_was_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Deterministic `id` for an upsert node: `omg/{type}/{slug}` (spec.md §3).
/// The slug is derived from `canonicalKey` when present, else `description`.
pub fn upsert_id(node_type: NodeType, canonical_key_or_description: &str) -> String {
    format!("omg/{}/{}", node_type.dir_segment(), slugify(canonical_key_or_description))
}

/// Deterministic file path for an upsert node, relative to the graph root.
pub fn upsert_file_path(node_type: NodeType, canonical_key_or_description: &str) -> String {
    format!("nodes/{}/{}.md", node_type.dir_segment(), slugify(canonical_key_or_description))
}

/// Classic (legacy, non-upsert) observation file path:
/// `{type}-{slug}-{YYYY-MM-DD}[-N].md`, collision-suffixed per spec.md §3.
pub fn classic_file_path(node_type: NodeType, slug_source: &str, date: &str, collision_n: u32) -> String {
    let slug = slugify(slug_source);
    if collision_n == 0 {
        format!("nodes/{}/{}-{}-{}.md", node_type.dir_segment(), node_type.dir_segment(), slug, date)
    } else {
        format!("nodes/{}/{}-{}-{}-{}.md", node_type.dir_segment(), node_type.dir_segment(), slug, date, collision_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_and_lowercases() {
        assert_eq!(slugify("Editor Theme!!"), "editor-theme");
        assert_eq!(slugify("preferences.editor_theme"), "preferences-editor-theme");
        assert_eq!(slugify("  leading and trailing  "), "leading-and-trailing");
    }

    #[test]
    fn upsert_id_is_deterministic() {
        let a = upsert_id(NodeType::Preference, "preferences.editor_theme");
        let b = upsert_id(NodeType::Preference, "preferences.editor_theme");
        assert_eq!(a, b);
        assert_eq!(a, "omg/preference/preferences-editor-theme");
    }

    #[test]
    fn upsert_file_path_matches_id_slug() {
        let path = upsert_file_path(NodeType::Preference, "preferences.editor_theme");
        assert_eq!(path, "nodes/preference/preferences-editor-theme.md");
    }
}
