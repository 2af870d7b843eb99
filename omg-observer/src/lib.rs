//! # omg-observer
//!
//! The Extract/Merge observer pipeline (spec.md §4.4-§4.5, §4.10): builds
//! LLM prompts, parses their XML responses with diagnostics rather than
//! hard failures, runs the pre- and post-extraction guardrails, and applies
//! the decided action (create, merge, alias) against the registry and node
//! files.

mod apply_action;
mod extract_model;
mod extract_parse;
mod guardrail;
mod merge_decision;
mod pipeline;
mod prompts;
mod suppression;

pub use apply_action::{apply_action, AppliedAction};
pub use extract_model::{AcceptedOperation, ExtractOutcome, NowPatch, RejectedOperation, RejectionReason};
pub use extract_parse::parse_extract_response;
pub use guardrail::{evaluate_guardrail, GuardrailDecision};
pub use merge_decision::{parse_merge_decision, MergeAction, MergeDecision};
pub use pipeline::{observe_turn, ObservationOutcome};
pub use prompts::{extract_system_prompt, extract_user_prompt, merge_system_prompt, merge_user_prompt};
pub use suppression::suppress_near_duplicates;
