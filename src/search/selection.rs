//! Candidate list with keyboard selection
//!
//! The index is `None` (no explicit selection) or a valid position in the
//! current list. Replacing the list always resets it, so it can never point
//! into a previous search's results.

use crate::geo::Candidate;

/// Candidate list plus the highlighted entry
#[derive(Debug, Clone, Default)]
pub struct Selection {
    candidates: Vec<Candidate>,
    index: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list wholesale and reset the selection
    pub fn replace(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.index = None;
    }

    /// Empty the list and reset the selection
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Currently highlighted index, if any
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Arrow-Down: next entry, wrapping from last to first
    ///
    /// From no selection the first press lands on index 0. Returns the index
    /// to scroll into view, or None when the list is empty.
    pub fn move_down(&mut self) -> Option<usize> {
        let len = self.candidates.len();
        if len == 0 {
            return None;
        }
        let next = match self.index {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.index = Some(next);
        Some(next)
    }

    /// Arrow-Up: previous entry, wrapping from first to last
    ///
    /// From no selection the first press lands on the last entry.
    pub fn move_up(&mut self) -> Option<usize> {
        let len = self.candidates.len();
        if len == 0 {
            return None;
        }
        let next = match self.index {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.index = Some(next);
        Some(next)
    }

    /// The candidate a commit should use
    ///
    /// An explicit index (pointer click) wins; otherwise the highlighted
    /// entry; otherwise the top result. None if the list is empty or the
    /// explicit index is out of range.
    pub fn resolve(&self, explicit: Option<usize>) -> Option<(usize, &Candidate)> {
        let index = explicit.or(self.index).unwrap_or(0);
        self.candidates.get(index).map(|c| (index, c))
    }
}
