//! Captured pieces tracking
//!
//! Tracks pieces captured by each player and calculates material advantage.
//!
//! # Material Advantage
//!
//! Positive advantage means White is ahead, negative means Black is ahead.
//! Example: If White captured (Rook=500, Pawn=100) and Black captured
//! (Knight=300), White's advantage is (500+100) - 300 = +300 centipawns.

use serde::{Deserialize, Serialize};

use crate::game::components::{PieceColor, PieceType};
use crate::game::types::Centipawns;

/// Captured pieces for both sides
///
/// # Fields
///
/// - `white_captured`: Black pieces that White has captured
/// - `black_captured`: White pieces that Black has captured
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPieces {
    /// Pieces captured by white (black pieces taken)
    pub white_captured: Vec<PieceType>,
    /// Pieces captured by black (white pieces taken)
    pub black_captured: Vec<PieceType>,
}

impl CapturedPieces {
    /// Record a piece capture
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// // White captures Black's queen
    /// captured.add_capture(PieceColor::Black, PieceType::Queen);
    /// assert_eq!(captured.white_captured.len(), 1);
    /// ```
    pub fn add_capture(&mut self, captured_piece_color: PieceColor, piece_type: PieceType) {
        match captured_piece_color {
            // If white piece was captured, black gets credit
            PieceColor::White => self.black_captured.push(piece_type),
            // If black piece was captured, white gets credit
            PieceColor::Black => self.white_captured.push(piece_type),
        }
    }

    /// Pieces taken by `color`
    pub fn taken_by(&self, color: PieceColor) -> &[PieceType] {
        match color {
            PieceColor::White => &self.white_captured,
            PieceColor::Black => &self.black_captured,
        }
    }

    /// Material difference, positive when White is ahead
    pub fn material_advantage(&self) -> Centipawns {
        let white: Centipawns = self.white_captured.iter().map(|p| Centipawns::for_piece(*p)).sum();
        let black: Centipawns = self.black_captured.iter().map(|p| Centipawns::for_piece(*p)).sum();
        white - black
    }
}
