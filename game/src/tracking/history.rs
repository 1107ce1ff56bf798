//! Undo history

use crate::types::GameState;

/// Snapshots taken before each mutating action, most recent last
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<GameState>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: GameState) {
        self.entries.push(snapshot);
    }

    /// Remove and return the most recent snapshot
    pub fn pop(&mut self) -> Option<GameState> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&GameState> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
