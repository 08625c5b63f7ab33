//! Guess assembler: the fragments picked so far, in order, and the
//! text they spell.
//!
//! Holds ids only. Fragment availability stays with the pool, so
//! whoever clears a guess also decides whether to restore it.

use super::fragment::FragmentId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Guess {
    selected: Vec<FragmentId>,
    text: String,
}

impl Guess {
    pub fn new() -> Self {
        Guess::default()
    }

    /// No validation: any sequence of fragments can be assembled.
    pub fn append(&mut self, id: FragmentId, text: &str) {
        self.selected.push(id);
        self.text.push_str(text);
    }

    /// Empty the guess, handing back the ids that were in it.
    pub fn clear(&mut self) -> Vec<FragmentId> {
        self.text.clear();
        std::mem::take(&mut self.selected)
    }

    pub fn current_text(&self) -> &str {
        &self.text
    }

    pub fn selected(&self) -> &[FragmentId] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
