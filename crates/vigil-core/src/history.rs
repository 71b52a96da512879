//! Capacity-bounded, dedup-aware undo/redo history.
//!
//! Entries live in an index-addressed [`VecDeque`] with an integer cursor,
//! so front eviction is O(1) and no entry is ever referenced by pointer.
//! The stack treats entries as opaque apart from their [`Signed`]
//! signature, which it compares only when deduplication is enabled.
//!
//! Every boundary operation (undo at the floor, redo at the ceiling, any
//! navigation on an empty stack) is a no-op with a well-defined result.

use std::collections::VecDeque;

use vigil_types::HistoryEntry;

use crate::config::HistoryConfig;

/// Anything carrying a canonical signature.
pub trait Signed {
    /// Canonical signature. Equal signatures mean semantically equal state.
    fn signature(&self) -> &str;
}

impl Signed for HistoryEntry {
    fn signature(&self) -> &str {
        &self.signature
    }
}

/// What a push or replace did to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The current entry was overwritten in place.
    Replaced,
    /// A new entry was appended and became current.
    Appended {
        /// Entries past the old cursor that were abandoned.
        discarded_redo: usize,
        /// Entries evicted from the front to stay within `max_size`.
        evicted: usize,
    },
}

/// Undo/redo stack of captured entries.
///
/// Invariant: `cursor` is `None` exactly when the stack is empty, and
/// otherwise indexes a stored entry.
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    entries: VecDeque<T>,
    cursor: Option<usize>,
    config: HistoryConfig,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<T> HistoryStack<T> {
    /// Create an empty stack.
    pub const fn new(config: HistoryConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            config,
        }
    }

    fn overwrite_current(&mut self, entry: T) -> PushOutcome {
        if let Some(slot) = self.cursor.and_then(|c| self.entries.get_mut(c)) {
            *slot = entry;
        }
        PushOutcome::Replaced
    }

    /// Step back one entry and return the new current entry.
    ///
    /// At the oldest entry this is a no-op returning the unchanged current.
    pub fn undo(&mut self) -> Option<&T> {
        if let Some(cursor) = self.cursor
            && cursor > 0
        {
            self.cursor = cursor.checked_sub(1);
        }
        self.current()
    }

    /// Step forward one entry and return the new current entry.
    ///
    /// At the newest entry this is a no-op returning the unchanged current.
    pub fn redo(&mut self) -> Option<&T> {
        if self.can_redo() {
            self.cursor = self.cursor.and_then(|c| c.checked_add(1));
        }
        self.current()
    }

    /// Entry at the cursor, or `None` when empty.
    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// Whether [`undo`](Self::undo) would move the cursor.
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether [`redo`](Self::redo) would move the cursor.
    pub fn can_redo(&self) -> bool {
        self.cursor
            .and_then(|c| c.checked_add(1))
            .is_some_and(|next| next < self.entries.len())
    }

    /// Drop every entry and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Cursor position, `None` when empty.
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at an index, oldest first.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Entries in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// The configuration in use.
    pub const fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

impl<T: Signed> HistoryStack<T> {
    /// Push an entry.
    ///
    /// With dedupe enabled and a signature equal to the current entry's,
    /// the current entry is replaced in place. Otherwise the redo branch is
    /// discarded, the entry is appended and becomes current, and the oldest
    /// entries are evicted while the stack exceeds `max_size`.
    pub fn push(&mut self, entry: T) -> PushOutcome {
        let duplicate = self.config.dedupe
            && self
                .current()
                .is_some_and(|current| current.signature() == entry.signature());
        if duplicate {
            return self.overwrite_current(entry);
        }

        let keep = self.cursor.map_or(0, |c| c.saturating_add(1));
        let discarded_redo = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);
        self.entries.push_back(entry);

        let mut evicted: usize = 0;
        if let Some(max) = self.config.max_size {
            while self.entries.len() > max.get() {
                self.entries.pop_front();
                evicted = evicted.saturating_add(1);
            }
        }

        // The new entry is always last, so eviction shifts it to len - 1.
        self.cursor = self.entries.len().checked_sub(1);
        PushOutcome::Appended {
            discarded_redo,
            evicted,
        }
    }

    /// Overwrite the current entry in place, keeping the cursor and the redo
    /// branch. On an empty stack this is a [`push`](Self::push).
    pub fn replace_current(&mut self, entry: T) -> PushOutcome {
        if self.cursor.is_none() {
            return self.push(entry);
        }
        self.overwrite_current(entry)
    }
}

impl<T: Clone> HistoryStack<T> {
    /// Copy of the entries in chronological order.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Snap {
        sig: &'static str,
        t: u32,
    }

    impl Signed for Snap {
        fn signature(&self) -> &str {
            self.sig
        }
    }

    const fn snap(sig: &'static str, t: u32) -> Snap {
        Snap { sig, t }
    }

    fn bounded(max: usize) -> HistoryStack<Snap> {
        HistoryStack::new(HistoryConfig {
            dedupe: false,
            max_size: NonZeroUsize::new(max),
        })
    }

    fn deduping() -> HistoryStack<Snap> {
        HistoryStack::new(HistoryConfig {
            dedupe: true,
            max_size: None,
        })
    }

    #[test]
    fn empty_stack_is_inert() {
        let mut stack: HistoryStack<Snap> = HistoryStack::default();
        assert!(stack.current().is_none());
        assert!(stack.undo().is_none());
        assert!(stack.redo().is_none());
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert!(stack.cursor().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn dedupe_replaces_current_with_same_signature() {
        let mut stack = deduping();
        stack.push(snap("s", 1));
        let outcome = stack.push(snap("s", 2));
        assert_eq!(outcome, PushOutcome::Replaced);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current().unwrap().t, 2);
    }

    #[test]
    fn dedupe_compares_only_against_current() {
        let mut stack = deduping();
        stack.push(snap("a", 1));
        stack.push(snap("b", 2));
        stack.push(snap("a", 3));
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn without_dedupe_equal_signatures_append() {
        let mut stack: HistoryStack<Snap> = HistoryStack::default();
        stack.push(snap("s", 1));
        stack.push(snap("s", 2));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn max_size_evicts_from_front() {
        let mut stack = bounded(2);
        stack.push(snap("1", 1));
        stack.push(snap("2", 2));
        let outcome = stack.push(snap("3", 3));
        assert_eq!(
            outcome,
            PushOutcome::Appended {
                discarded_redo: 0,
                evicted: 1
            }
        );
        assert_eq!(stack.to_vec(), vec![snap("2", 2), snap("3", 3)]);
        assert_eq!(stack.current(), Some(&snap("3", 3)));
        assert_eq!(stack.cursor(), Some(1));
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut stack: HistoryStack<Snap> = HistoryStack::default();
        for (sig, t) in [("A", 1), ("B", 2), ("C", 3)] {
            stack.push(snap(sig, t));
        }
        assert_eq!(stack.undo().unwrap().sig, "B");
        assert_eq!(stack.undo().unwrap().sig, "A");
        assert!(!stack.can_undo());
        assert_eq!(stack.undo().unwrap().sig, "A");
        assert_eq!(stack.redo().unwrap().sig, "B");
        assert_eq!(stack.redo().unwrap().sig, "C");
        assert!(!stack.can_redo());
        assert_eq!(stack.redo().unwrap().sig, "C");
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut stack: HistoryStack<Snap> = HistoryStack::default();
        stack.push(snap("A", 1));
        stack.push(snap("B", 2));
        stack.push(snap("C", 3));
        stack.undo();
        stack.undo();
        let outcome = stack.push(snap("D", 4));
        assert_eq!(
            outcome,
            PushOutcome::Appended {
                discarded_redo: 2,
                evicted: 0
            }
        );
        let sigs: Vec<&str> = stack.iter().map(|s| s.sig).collect();
        assert_eq!(sigs, vec!["A", "D"]);
        assert!(!stack.can_redo());
    }

    #[test]
    fn dedupe_after_undo_keeps_redo_branch() {
        let mut stack = deduping();
        stack.push(snap("A", 1));
        stack.push(snap("B", 2));
        stack.undo();
        assert_eq!(stack.push(snap("A", 9)), PushOutcome::Replaced);
        assert_eq!(stack.len(), 2);
        assert!(stack.can_redo());
        assert_eq!(stack.current().unwrap().t, 9);
    }

    #[test]
    fn replace_current_keeps_cursor_and_redo() {
        let mut stack: HistoryStack<Snap> = HistoryStack::default();
        stack.push(snap("A", 1));
        stack.push(snap("B", 2));
        stack.undo();
        assert_eq!(stack.replace_current(snap("A2", 5)), PushOutcome::Replaced);
        assert_eq!(stack.cursor(), Some(0));
        assert_eq!(stack.current().unwrap().sig, "A2");
        assert_eq!(stack.redo().unwrap().sig, "B");
    }

    #[test]
    fn replace_current_on_empty_pushes() {
        let mut stack: HistoryStack<Snap> = HistoryStack::default();
        let outcome = stack.replace_current(snap("A", 1));
        assert!(matches!(outcome, PushOutcome::Appended { .. }));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.cursor(), Some(0));
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut stack = bounded(3);
        stack.push(snap("A", 1));
        stack.push(snap("B", 2));
        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.cursor().is_none());
        stack.push(snap("C", 3));
        assert_eq!(stack.cursor(), Some(0));
    }

    #[test]
    fn cursor_stays_in_bounds_under_mixed_operations() {
        let mut stack = bounded(3);
        for t in 0..10_u32 {
            if t % 3 == 2 {
                stack.undo();
            } else {
                stack.push(snap(if t % 2 == 0 { "even" } else { "odd" }, t));
            }
            let cursor = stack.cursor().unwrap();
            assert!(cursor < stack.len());
            assert!(stack.len() <= 3);
        }
    }
}
