//! # History
//!
//! A bounded, linear undo/redo log of whole-document snapshots.
//!
//! Every commit stores a full [`Document`]. Grids are copy-on-write, so a snapshot only owns the
//! layers that changed since the previous one and the rest are shared. Worst case memory is still
//! `capacity × layers × size²` cells. That trade-off is what buys the fixed undo depth.

use std::collections::VecDeque;

use crate::{error::EditError, state::Document};

/// Default number of snapshots kept, including the present.
pub const MAX_HISTORY: usize = 20;

#[derive(Clone, Debug)]
pub struct HistoryStack {
    // Never empty. Oldest at the front.
    entries: VecDeque<Document>,
    // Index of the entry matching the live document.
    cursor: usize,
    capacity: usize,
}
impl HistoryStack {
    /// Start a history at `initial`, with [`MAX_HISTORY`] capacity.
    #[must_use]
    pub fn new(initial: &Document) -> Self {
        Self {
            entries: VecDeque::from([initial.clone()]),
            cursor: 0,
            capacity: MAX_HISTORY,
        }
    }
    /// Start a history with a custom capacity. Capacity counts the present entry too, so it must be
    /// at least one.
    pub fn with_capacity(initial: &Document, capacity: usize) -> Result<Self, EditError> {
        if capacity == 0 {
            return Err(EditError::InvalidArgument(
                "history capacity must be at least 1".to_owned(),
            ));
        }
        Ok(Self {
            capacity,
            ..Self::new(initial)
        })
    }
    /// Forget everything, restarting at `document`.
    pub fn init(&mut self, document: &Document) {
        self.entries.clear();
        self.entries.push_back(document.clone());
        self.cursor = 0;
    }
    /// Record `document` as the newest undoable point.
    ///
    /// Anything that was undone is discarded. If the history is then over capacity, the oldest
    /// entry is dropped and the cursor still points at the entry just committed.
    pub fn commit(&mut self, document: &Document) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(document.clone());
        self.cursor = self.entries.len() - 1;
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.cursor -= 1;
            log::debug!("History full, evicted oldest entry");
        }
        log::trace!("Committed history entry {}/{}", self.cursor + 1, self.entries.len());
    }
    /// Step back one entry, returning a copy of it to become the live document.
    /// `None` if already at the oldest entry.
    pub fn undo(&mut self) -> Option<Document> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }
    /// Step forward one entry, returning a copy of it to become the live document.
    /// `None` if nothing has been undone.
    pub fn redo(&mut self) -> Option<Document> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }
    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> &Document {
        &self.entries[self.cursor]
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    /// Always false, a history holds at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
