//! Turn tracking
//!
//! Manages the current player's turn and move counter for a chess game.
//! This value is the single source of truth for whose turn it is.
//!
//! # Turn Flow
//!
//! ```text
//! Move 1: White plays → switch() → Black plays → switch() → Move 2: White plays
//! ```
//!
//! # Reference
//!
//! Standard chess turn tracking following FIDE rules where White moves first
//! and move numbers increment after Black's move completes.

use serde::{Deserialize, Serialize};

use crate::game::components::PieceColor;

/// Tracks whose turn it currently is and the current move number
///
/// # Fields
///
/// - `color`: The player who should move next (White or Black)
/// - `move_number`: Current move number in chess notation (starts at 1)
///
/// # Move Counting
///
/// Move numbers follow standard chess notation:
/// - Move 1: White's first move and Black's response
/// - Move 2: White's second move and Black's response
/// - Increments only after Black completes their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentTurn {
    pub color: PieceColor,
    pub move_number: u32,
}

impl Default for CurrentTurn {
    fn default() -> Self {
        Self {
            color: PieceColor::White,
            move_number: 1,
        }
    }
}

impl CurrentTurn {
    /// Switch to the other player's turn
    ///
    /// Increments the move number only when switching from Black to White,
    /// following standard chess notation where a "move" consists of both
    /// White's and Black's turns.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut turn = CurrentTurn::default();
    /// turn.switch(); // Now Black's turn, still move 1
    /// turn.switch(); // Now White's turn, move 2
    /// assert_eq!(turn.move_number, 2);
    /// ```
    pub fn switch(&mut self) {
        self.color = match self.color {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => {
                self.move_number += 1;
                PieceColor::White
            }
        };
    }
}
