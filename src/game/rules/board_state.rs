//! Board state representation for move validation
//!
//! [`BoardState`] is the 8x8 occupancy grid plus a per-color registry of
//! occupied squares. It is a mechanism, not a policy: it relocates pieces on
//! request and answers occupancy / path queries, but never checks whether a
//! move is legal. Legality lives in [`super::legality`].
//!
//! # Registries
//!
//! Each color's registry is a 64-bit occupancy mask (bit 0 = a1, bit 63 = h8),
//! updated by every mutation so that iterating a color's pieces never scans
//! empty cells.
//!
//! # Speculative Copies
//!
//! `BoardState` is `Clone` and the clone is a full deep copy (pieces are plain
//! values, ids and has-moved flags included). The legality checker clones the
//! authoritative board, plays the candidate move on the copy and drops it.

use std::fmt;

use crate::game::components::{Piece, PieceColor, PieceId, PieceType};
use crate::game::error::{GameError, GameResult};
use crate::game::types::Square;

/// Standard back-rank layout, file a to file h
const BACK_ROW: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Represents the state of the board for move validation
#[derive(Clone)]
pub struct BoardState {
    cells: [Option<Piece>; 64],
    occupancy: [u64; 2],
    next_id: u16,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoardState {
    /// Board with no pieces
    pub fn empty() -> Self {
        Self {
            cells: [None; 64],
            occupancy: [0; 2],
            next_id: 0,
        }
    }

    /// Standard starting position
    pub fn standard() -> Self {
        let mut board = Self::empty();

        for color in [PieceColor::White, PieceColor::Black] {
            let back = color.back_rank();
            let pawns = color.pawn_rank();
            for (file, &piece_type) in BACK_ROW.iter().enumerate() {
                let file = file as u8;
                if let Some(square) = Square::from_index((back * 8 + file) as usize) {
                    board.spawn(square, piece_type, color);
                }
                if let Some(square) = Square::from_index((pawns * 8 + file) as usize) {
                    board.spawn(square, PieceType::Pawn, color);
                }
            }
        }

        board
    }

    /// Create a fresh piece with a new id and place it, replacing any occupant
    pub fn spawn(&mut self, square: Square, piece_type: PieceType, color: PieceColor) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.place(square, Some(Piece::new(id, piece_type, color, square)));
        id
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.cells[square.index()].as_ref()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.cells[square.index()].is_none()
    }

    pub fn get_piece_color(&self, square: Square) -> Option<PieceColor> {
        self.piece_at(square).map(|piece| piece.color)
    }

    /// Put `piece` (or nothing) on `square`, returning the previous occupant
    ///
    /// The placed piece's `square` field is rewritten to `square`.
    pub fn place(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        let index = square.index();
        let mask = 1u64 << index;

        let previous = self.cells[index].take();
        if let Some(old) = &previous {
            self.occupancy[old.color.index()] &= !mask;
        }

        if let Some(mut piece) = piece {
            piece.square = square;
            self.occupancy[piece.color.index()] |= mask;
            self.cells[index] = Some(piece);
        }

        previous
    }

    /// Remove and return the piece on `square`
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.place(square, None)
    }

    /// Relocate whatever stands on `from` to `to` without validation
    ///
    /// Returns the piece that previously occupied `to`, if any. Moving from an
    /// empty square clears `to`.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mover = self.remove(from);
        self.place(to, mover)
    }

    pub(crate) fn set_has_moved(&mut self, square: Square, has_moved: bool) {
        if let Some(piece) = self.cells[square.index()].as_mut() {
            piece.has_moved = has_moved;
        }
    }

    /// True iff every square strictly between `from` and `to` is empty
    ///
    /// Only meaningful for squares sharing a rank, file or diagonal; returns
    /// `false` for any other pair. Adjacent squares are trivially clear.
    pub fn path_clear(&self, from: Square, to: Square) -> bool {
        let dx = to.file().index() as i8 - from.file().index() as i8;
        let dy = to.rank().index() as i8 - from.rank().index() as i8;

        if from == to || (dx != 0 && dy != 0 && dx.abs() != dy.abs()) {
            return false;
        }

        let (step_x, step_y) = (dx.signum(), dy.signum());
        let mut current = from.offset(step_x, step_y);

        while let Some(square) = current {
            if square == to {
                return true;
            }
            if !self.is_empty(square) {
                return false;
            }
            current = square.offset(step_x, step_y);
        }

        false
    }

    /// Iterate over one color's pieces in square order (a1 first)
    pub fn pieces(&self, color: PieceColor) -> impl Iterator<Item = &Piece> + '_ {
        let mut bits = self.occupancy[color.index()];
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            self.cells[index].as_ref()
        })
    }

    pub fn piece_count(&self, color: PieceColor) -> u32 {
        self.occupancy[color.index()].count_ones()
    }

    pub fn king_square(&self, color: PieceColor) -> Option<Square> {
        self.pieces(color)
            .find(|piece| piece.piece_type == PieceType::King)
            .map(|piece| piece.square)
    }

    /// Square of `color`'s king, or the invariant violation
    pub fn require_king(&self, color: PieceColor) -> GameResult<Square> {
        self.king_square(color).ok_or_else(|| {
            tracing::error!("[RULES] Board invariant violated: no {} king", color);
            GameError::MissingKing { color }
        })
    }

    /// Check the one-king-per-color invariant
    pub fn validate_kings(&self) -> GameResult<()> {
        for color in [PieceColor::White, PieceColor::Black] {
            let kings = self
                .pieces(color)
                .filter(|piece| piece.piece_type == PieceType::King)
                .count();
            match kings {
                0 => return Err(GameError::MissingKing { color }),
                1 => {}
                count => {
                    tracing::error!("[RULES] Board invariant violated: {} {} kings", count, color);
                    return Err(GameError::ExtraKing { color, count });
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells && self.occupancy == other.occupancy
    }
}

impl Eq for BoardState {}

impl fmt::Debug for BoardState {
    /// Rank 8 at the top, `.` for empty squares, FEN letters for pieces
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let cell = self.cells[(rank * 8 + file) as usize];
                let c = cell.map(|piece| piece.fen_char()).unwrap_or('.');
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
