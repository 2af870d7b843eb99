//! # omg-io
//!
//! Frontmatter parsing/serialization for node files, plus the atomic
//! write-temp-then-rename primitive and ENOENT-tolerant reads used by
//! every other crate that touches the filesystem (spec.md §1 Component
//! 1 "Frontmatter/IO").

pub mod atomic;
pub mod fs_read;
pub mod frontmatter;
pub mod node_file;
pub mod path;
pub mod yaml_value;

pub use atomic::write_atomic;
pub use fs_read::read_to_string_opt;
pub use frontmatter::{parse_frontmatter, serialize_frontmatter};
pub use node_file::{parse_node, serialize_node};
pub use path::{classic_file_path, slugify, upsert_file_path, upsert_id};
pub use yaml_value::YamlValue;
