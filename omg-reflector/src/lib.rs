//! # omg-reflector
//!
//! Progressive-compression reflection (spec.md §4.12): selecting
//! observation nodes eligible for synthesis, driving the Reflection LLM
//! through escalating compression levels until the rendered result fits
//! the context token threshold (or level 3 is reached), and applying the
//! outcome — new reflection nodes, source archival, MOC updates, and
//! arbitrary field updates.

mod apply;
mod model;
mod parse;
mod prompts;
mod selection;
mod synthesize;

pub use apply::apply_reflection_outcome;
pub use model::{
    FieldAction, NodeFieldUpdate, ReflectionNodeCandidate, ReflectionOutcome, ReflectionSummary,
    UpdateField,
};
pub use parse::parse_reflection_response;
pub use prompts::{reflection_system_prompt, reflection_user_prompt};
pub use selection::select_reflection_candidates;
pub use synthesize::run_reflection;
