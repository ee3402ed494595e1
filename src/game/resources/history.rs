//! Move history and position repetition tracking
//!
//! [`MoveHistory`] is the append-only list of committed plies.
//! [`PositionCounts`] maps a position key (see [`crate::game::fen::position_key`])
//! to the number of times that position has occurred in the game.

use std::collections::HashMap;

use crate::game::components::MoveRecord;

/// Committed moves in play order
#[derive(Debug, Default, Clone)]
pub struct MoveHistory {
    pub moves: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn add_move(&mut self, record: MoveRecord) {
        self.moves.push(record);
    }

    /// Get the last move made
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.moves.last()
    }

    /// Get a move by zero-based ply index
    pub fn get_move(&self, index: usize) -> Option<&MoveRecord> {
        self.moves.get(index)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveRecord> {
        self.moves.iter()
    }
}

/// Occurrence count per position key
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PositionCounts {
    counts: HashMap<u64, u32>,
}

impl PositionCounts {
    /// Count one more occurrence of `key` and return the new total
    pub fn record(&mut self, key: u64) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, key: u64) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Highest occurrence count of any position so far
    pub fn max_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Number of distinct positions seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
