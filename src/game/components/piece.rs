//! Piece-related components

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::error::{GameError, GameResult};
use crate::game::types::{Centipawns, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    #[default]
    White,
    Black,
}

impl PieceColor {
    pub fn opposite(self) -> PieceColor {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Rank direction pawns of this color advance in
    pub fn forward(self) -> i8 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => -1,
        }
    }

    /// Zero-based rank holding this color's king and rooks at the start
    pub fn back_rank(self) -> u8 {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => 7,
        }
    }

    /// Zero-based rank this color's pawns start on (double push allowed from here)
    pub fn pawn_rank(self) -> u8 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => 6,
        }
    }

    /// Zero-based rank where this color's pawns promote
    pub fn promotion_rank(self) -> u8 {
        match self {
            PieceColor::White => 7,
            PieceColor::Black => 0,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => 1,
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceColor::White => write!(f, "white"),
            PieceColor::Black => write!(f, "black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    #[default]
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// Uppercase letter used in SAN and FEN (`P` for pawns)
    pub fn letter(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Rook => 'R',
            PieceType::Pawn => 'P',
        }
    }

    /// Parse a FEN piece letter, either case
    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceType::King),
            'Q' => Some(PieceType::Queen),
            'B' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            'R' => Some(PieceType::Rook),
            'P' => Some(PieceType::Pawn),
            _ => None,
        }
    }

    /// Parse a promotion choice (`q`, `r`, `b`, `n`, either case)
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidPromotion`] for kings, pawns and unknown letters.
    pub fn from_promotion_char(c: char) -> GameResult<PieceType> {
        match PieceType::from_letter(c) {
            Some(piece_type) if piece_type.is_promotion_target() => Ok(piece_type),
            _ => Err(GameError::InvalidPromotion { piece: c }),
        }
    }

    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight
        )
    }

    pub fn is_minor(self) -> bool {
        matches!(self, PieceType::Bishop | PieceType::Knight)
    }
}

/// Stable identity of a piece across moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u16);

/// A piece on the board
///
/// `square` always mirrors the cell the board stores the piece in; the board
/// updates it on every relocation. `has_moved` gates castling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub piece_type: PieceType,
    pub color: PieceColor,
    pub square: Square,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(id: PieceId, piece_type: PieceType, color: PieceColor, square: Square) -> Self {
        Self {
            id,
            piece_type,
            color,
            square,
            has_moved: false,
        }
    }

    /// Material value of this piece
    pub fn value(&self) -> Centipawns {
        Centipawns::for_piece(self.piece_type)
    }

    /// FEN character: uppercase for White, lowercase for Black
    pub fn fen_char(&self) -> char {
        let letter = self.piece_type.letter();
        match self.color {
            PieceColor::White => letter,
            PieceColor::Black => letter.to_ascii_lowercase(),
        }
    }
}
