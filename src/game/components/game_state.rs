//! Move records - the value object describing one committed ply
//!
//! A [`MoveRecord`] is built by the game session while a move is being
//! committed (mover, squares, capture, promotion, classification, check flags)
//! and is immutable once appended to [`crate::game::resources::MoveHistory`].
//! Its Standard Algebraic Notation is rendered on first request and cached.
//!
//! # SAN Rendering
//!
//! | Move | Notation |
//! |------|----------|
//! | Pawn push | `e4` |
//! | Pawn capture | `exd5` |
//! | Piece move | `Nf3`, `Rad1`, `R1a3`, `Qh4e1` |
//! | Capture | `Bxc6` |
//! | Promotion | `e8=Q`, `exd8=N` |
//! | Castling | `O-O`, `O-O-O` |
//! | Check / mate suffix | `+` / `#` |

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceColor, PieceType};
use crate::game::types::Square;

/// Classification of a single ply
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Normal,
    Capture,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion,
}

impl MoveKind {
    pub fn is_castle(self) -> bool {
        matches!(self, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    }
}

/// How much of the origin square SAN needs to tell two like pieces apart
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Disambiguation {
    #[default]
    None,
    File,
    Rank,
    Square,
}

/// Move record for history
///
/// Built with [`MoveRecord::new`] and the `with_*` methods before commit.
/// Fields are read through accessors only, so a committed record cannot
/// change under its cached notation.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    /// Ply number, 1 for White's first move
    sequence: u32,
    piece_type: PieceType,
    piece_color: PieceColor,
    from: Square,
    to: Square,
    captured: Option<PieceType>,
    promotion: Option<PieceType>,
    kind: MoveKind,
    is_check: bool,
    is_checkmate: bool,
    disambiguation: Disambiguation,
    notation: OnceCell<String>,
}

impl MoveRecord {
    pub fn new(sequence: u32, mover: &Piece, from: Square, to: Square, kind: MoveKind) -> Self {
        Self {
            sequence,
            piece_type: mover.piece_type,
            piece_color: mover.color,
            from,
            to,
            captured: None,
            promotion: None,
            kind,
            is_check: false,
            is_checkmate: false,
            disambiguation: Disambiguation::None,
            notation: OnceCell::new(),
        }
    }

    pub fn with_capture(mut self, captured: Option<PieceType>) -> Self {
        self.captured = captured;
        self.notation = OnceCell::new();
        self
    }

    pub fn with_promotion(mut self, promotion: Option<PieceType>) -> Self {
        self.promotion = promotion;
        self.notation = OnceCell::new();
        self
    }

    pub fn with_disambiguation(mut self, disambiguation: Disambiguation) -> Self {
        self.disambiguation = disambiguation;
        self.notation = OnceCell::new();
        self
    }

    pub fn with_flags(mut self, is_check: bool, is_checkmate: bool) -> Self {
        self.is_check = is_check || is_checkmate;
        self.is_checkmate = is_checkmate;
        self.notation = OnceCell::new();
        self
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    pub fn piece_color(&self) -> PieceColor {
        self.piece_color
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    pub fn captured(&self) -> Option<PieceType> {
        self.captured
    }

    pub fn promotion(&self) -> Option<PieceType> {
        self.promotion
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn is_check(&self) -> bool {
        self.is_check
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_checkmate
    }

    pub fn disambiguation(&self) -> Disambiguation {
        self.disambiguation
    }

    /// SAN for this move, rendered once and cached
    pub fn notation(&self) -> &str {
        self.notation.get_or_init(|| self.render_san())
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    fn render_san(&self) -> String {
        let mut san = match self.kind {
            MoveKind::CastleKingside => "O-O".to_string(),
            MoveKind::CastleQueenside => "O-O-O".to_string(),
            _ => self.render_body(),
        };

        if self.is_checkmate {
            san.push('#');
        } else if self.is_check {
            san.push('+');
        }
        san
    }

    fn render_body(&self) -> String {
        let mut san = String::new();

        if self.piece_type == PieceType::Pawn {
            if self.is_capture() {
                san.push(self.from.file().to_char());
                san.push('x');
            }
        } else {
            san.push(self.piece_type.letter());
            match self.disambiguation {
                Disambiguation::None => {}
                Disambiguation::File => san.push(self.from.file().to_char()),
                Disambiguation::Rank => san.push_str(&self.from.rank().to_number().to_string()),
                Disambiguation::Square => san.push_str(&self.from.to_algebraic()),
            }
            if self.is_capture() {
                san.push('x');
            }
        }

        san.push_str(&self.to.to_algebraic());

        if let Some(promotion) = self.promotion {
            san.push('=');
            san.push(promotion.letter());
        }
        san
    }
}
