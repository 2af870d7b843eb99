use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persisted resumable-bootstrap progress (spec.md §3 "Bootstrap state").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapState {
    pub total: usize,
    /// Monotonic: only grows across the lifetime of a bootstrap run.
    pub done: BTreeSet<usize>,
    pub ok: usize,
    pub fail: usize,
    pub cursor: usize,
    pub completed: bool,
}

impl Default for BootstrapState {
    fn default() -> Self {
        Self { total: 0, done: BTreeSet::new(), ok: 0, fail: 0, cursor: 0, completed: false }
    }
}

impl BootstrapState {
    pub fn new(total: usize) -> Self {
        Self { total, ..Default::default() }
    }

    /// Smallest batch index not yet in `done`. On resume, `cursor` must
    /// equal this value (spec.md §3 invariant).
    pub fn next_cursor(&self) -> usize {
        (0..self.total).find(|i| !self.done.contains(i)).unwrap_or(self.total)
    }

    /// Record a batch's completion and advance the cursor.
    pub fn mark_done(&mut self, index: usize, succeeded: bool) {
        self.done.insert(index);
        if succeeded {
            self.ok += 1;
        } else {
            self.fail += 1;
        }
        self.cursor = self.next_cursor();
        self.completed = self.done.len() >= self.total;
    }

    /// Batch indices still to run, in order.
    pub fn remaining(&self) -> Vec<usize> {
        (0..self.total).filter(|i| !self.done.contains(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_tracks_smallest_missing_index() {
        let mut s = BootstrapState::new(3);
        assert_eq!(s.next_cursor(), 0);
        s.mark_done(1, true);
        assert_eq!(s.next_cursor(), 0);
        s.mark_done(0, true);
        assert_eq!(s.next_cursor(), 2);
        s.mark_done(2, true);
        assert!(s.completed);
    }

    #[test]
    fn done_is_monotonic_across_resumes() {
        let mut s = BootstrapState::new(2);
        s.mark_done(0, true);
        let snapshot = s.done.clone();
        // Simulate a crash + resume: re-marking an already-done batch
        // must never shrink `done`.
        s.mark_done(0, true);
        assert!(snapshot.is_subset(&s.done));
    }
}
