//! Snapshot-based undo/redo.
//!
//! Each entry is a full deep copy of the element list and selection. There is
//! no diffing: restoring an entry is a plain replacement, so what comes back
//! is value-equal to what went in.
//!
//! ```text
//!  oldest                      cursor          newest
//!  [s0] [s1] [s2] ... [s(k-1)] [s(k)] [s(k+1)] ...
//!                               ▲
//!          undo moves left ◄────┴────► redo moves right
//! record() drops everything right of the cursor, then appends.
//! ```

use std::collections::{HashSet, VecDeque};

use crate::element::{Element, ElementId};

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One point in the document's history.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Every element, deep-copied with ids preserved.
    pub elements: Vec<Element>,
    /// Selected ids, sorted.
    pub selected_ids: Vec<ElementId>,
}

impl Snapshot {
    /// Capture the given state.
    ///
    /// Inline text editing is transient UI state and is not captured.
    #[must_use]
    pub fn capture(elements: &[Element], selection: &HashSet<ElementId>) -> Self {
        let mut elements = elements.to_vec();
        for element in &mut elements {
            if let Some(text) = element.as_text_mut() {
                text.stop_editing();
            }
        }
        Self {
            elements,
            selected_ids: sorted_ids(selection),
        }
    }

    /// Selection as a set.
    #[must_use]
    pub fn selection(&self) -> HashSet<ElementId> {
        self.selected_ids.iter().copied().collect()
    }
}

/// Bounded window of snapshots with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history holding at most `limit` snapshots (minimum 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Append a snapshot of the given state.
    ///
    /// Anything after the cursor is discarded first. When the window is full
    /// the oldest snapshot is evicted.
    pub fn record(&mut self, elements: &[Element], selection: &HashSet<ElementId>) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots
            .push_back(Snapshot::capture(elements, selection));
        self.cursor = self.snapshots.len() - 1;

        if self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
            self.cursor -= 1;
        }
        tracing::debug!(
            "History recorded: {} snapshots, cursor {}",
            self.snapshots.len(),
            self.cursor
        );
    }

    /// Overwrite the snapshot at the cursor with the given state.
    ///
    /// Used for changes that are not undo steps of their own (asset loads),
    /// so the next undo lands on what the user actually saw.
    pub fn amend(&mut self, elements: &[Element], selection: &HashSet<ElementId>) {
        if let Some(current) = self.snapshots.get_mut(self.cursor) {
            *current = Snapshot::capture(elements, selection);
        }
    }

    /// Overwrite only the selection of the snapshot at the cursor.
    pub fn amend_selection(&mut self, selection: &HashSet<ElementId>) {
        if let Some(current) = self.snapshots.get_mut(self.cursor) {
            current.selected_ids = sorted_ids(selection);
        }
    }

    /// Step back. Returns the snapshot to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        tracing::debug!("Undo to snapshot {}", self.cursor);
        self.snapshots.get(self.cursor)
    }

    /// Step forward. Returns the snapshot to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        tracing::debug!("Redo to snapshot {}", self.cursor);
        self.snapshots.get(self.cursor)
    }

    /// Whether [`History::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`History::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.cursor)
    }

    /// Position of the cursor.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum number of snapshots kept.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}

fn sorted_ids(selection: &HashSet<ElementId>) -> Vec<ElementId> {
    let mut ids: Vec<_> = selection.iter().copied().collect();
    ids.sort_unstable();
    ids
}
