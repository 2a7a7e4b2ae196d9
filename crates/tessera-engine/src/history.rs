//! Linear undo history over immutable snapshots.

use std::sync::Arc;

/// A sequence of snapshots plus a cursor.
///
/// The cursor always indexes a valid snapshot. Pushing discards everything
/// after the cursor before appending.
#[derive(Debug, Clone)]
pub struct History<T> {
    states: Vec<Arc<T>>,
    cursor: usize,
}

// Never empty: the initial snapshot is always kept.
#[allow(clippy::len_without_is_empty)]
impl<T> History<T> {
    /// History holding only `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            states: vec![Arc::new(initial)],
            cursor: 0,
        }
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> &Arc<T> {
        &self.states[self.cursor]
    }

    /// Drop the redo tail, append `state`, and move onto it.
    pub fn push(&mut self, state: T) -> Arc<T> {
        self.states.truncate(self.cursor + 1);
        let state = Arc::new(state);
        self.states.push(state.clone());
        self.cursor = self.states.len() - 1;
        state
    }

    /// Step back. Returns false at the oldest snapshot.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward. Returns false at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// True if an older snapshot exists.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// True if a newer snapshot exists.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.states.len()
    }

    /// Cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots, including the initial one.
    pub fn len(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let h = History::new(0);
        assert_eq!(**h.current(), 0);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_undo_redo_walks_the_cursor() {
        let mut h = History::new(0);
        h.push(1);
        h.push(2);
        assert!(h.undo());
        assert_eq!(**h.current(), 1);
        assert!(h.undo());
        assert!(!h.undo());
        assert_eq!(**h.current(), 0);
        assert!(h.redo());
        assert!(h.redo());
        assert!(!h.redo());
        assert_eq!(**h.current(), 2);
    }

    #[test]
    fn test_push_discards_redo_tail() {
        let mut h = History::new("a");
        h.push("b");
        h.push("c");
        h.undo();
        h.undo();
        h.push("d");
        assert_eq!(h.len(), 2);
        assert_eq!(h.cursor(), 1);
        assert!(!h.can_redo());
        h.undo();
        assert_eq!(**h.current(), "a");
    }

    #[test]
    fn test_snapshots_are_shared_not_copied() {
        let mut h = History::new(vec![1]);
        let pushed = h.push(vec![1, 2]);
        assert!(Arc::ptr_eq(&pushed, h.current()));
    }
}
