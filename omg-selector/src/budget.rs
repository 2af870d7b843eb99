use omg_core::errors::{OmgError, OmgResult, SelectorError};
use omg_core::model::Node;

use crate::pass2::HydratedCandidate;
use crate::render::render_node_block;
use crate::tokens::estimate_tokens;

/// Result of fitting one candidate pool (MOCs or regular nodes) into its
/// share of the remaining budget.
pub struct FittedPool {
    pub nodes: Vec<Node>,
    pub tokens_used: usize,
    pub dropped_ids: Vec<String>,
}

/// Keep the top-scored run of candidates that fits within `budget` tokens
/// and `max_count` nodes, in rank order. `candidates` must already be
/// sorted highest-scored first. The first candidate that doesn't fit the
/// remaining budget, and every lower-scored candidate after it, is
/// dropped — there is no backfill with a smaller node further down the
/// ranking (spec.md §4.8 "Drop lowest-scored first").
pub fn fit_pool(candidates: Vec<HydratedCandidate>, budget: usize, max_count: usize) -> FittedPool {
    let mut nodes = Vec::new();
    let mut dropped_ids = Vec::new();
    let mut tokens_used = 0usize;
    let mut stopped = false;

    for c in candidates {
        if stopped {
            dropped_ids.push(c.node.id.clone());
            continue;
        }
        if nodes.len() >= max_count {
            stopped = true;
            dropped_ids.push(c.node.id.clone());
            continue;
        }
        let cost = estimate_tokens(&render_node_block(&c.node));
        if tokens_used + cost <= budget {
            tokens_used += cost;
            nodes.push(c.node);
        } else {
            stopped = true;
            dropped_ids.push(c.node.id.clone());
        }
    }

    FittedPool { nodes, tokens_used, dropped_ids }
}

/// Split the remaining budget (after index/now/pinned) in half between
/// MOCs and regular nodes (spec.md §4.8).
pub fn split_remaining(max_context_tokens: usize, fixed_tokens: usize) -> OmgResult<(usize, usize)> {
    let remaining = max_context_tokens.checked_sub(fixed_tokens).ok_or_else(|| {
        OmgError::Selector(SelectorError::BudgetTooSmall { needed: fixed_tokens, budget: max_context_tokens })
    })?;
    let moc_budget = remaining / 2;
    let regular_budget = remaining - moc_budget;
    Ok((moc_budget, regular_budget))
}
