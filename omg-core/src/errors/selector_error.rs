/// Context selector errors.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("budget too small to fit index+now+pinned nodes: needed {needed}, budget {budget}")]
    BudgetTooSmall { needed: usize, budget: usize },

    #[error("failed to hydrate node '{id}': {reason}")]
    HydrationFailed { id: String, reason: String },
}
