// Linear undo log for the placement grid.
// Entries are recorded in the order they became current at a cell, so the
// same cell can show up many times. There is no redo.

use crate::grid::{GridCoord, PlacementEntry};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<PlacementEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: PlacementEntry) {
        trace!(
            col = entry.coord.col,
            row = entry.coord.row,
            tile = entry.tile.0,
            "history push"
        );
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<PlacementEntry> {
        self.entries.pop()
    }

    /// Most recent entry recorded at `coord`.
    pub fn last_at(&self, coord: GridCoord) -> Option<PlacementEntry> {
        self.entries.iter().rev().find(|e| e.coord == coord).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlacementEntry] {
        &self.entries
    }
}
