//! Game status state machine
//!
//! Tracks the game's classification after every committed ply and provides
//! methods for determining the outcome and displaying results.
//!
//! # States
//!
//! ## Playable
//! - **InProgress**: nothing special about the position
//! - **Check**: the side to move is in check but has a legal reply
//!
//! ## Terminal
//! - **Checkmate**: the side to move is in check with no legal moves
//!   (also entered by resignation, with the resigning side's opponent as winner)
//! - **Stalemate**: the side to move has no legal moves but is NOT in check
//! - **Draw**: fifty-move rule, repetition, insufficient material or agreement
//!
//! # Transition
//!
//! [`GameStatus::next`] is a pure function of the current status and a
//! [`PositionSummary`] of the position after the ply. Terminal states never
//! transition again.
//!
//! ```text
//! InProgress ⇄ Check → Checkmate / Stalemate / Draw(reason)
//! ```
//!
//! # Reference
//!
//! FIDE Laws of Chess: https://www.fide.com/FIDE/handbook/LawsOfChess.pdf
//! - Article 5: Checkmate, stalemate, draws
//! - Article 9: Fifty-move rule and repetition

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::GameSettings;
use crate::game::components::PieceColor;
use crate::game::error::GameResult;
use crate::game::rules::{self, BoardState, LastMove};

/// Why a game was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    /// Half-move clock reached the configured limit
    FiftyMove,
    /// One position occurred the configured number of times
    Repetition,
    /// Neither side has mating material
    InsufficientMaterial,
    /// Both players agreed
    Agreement,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::FiftyMove => write!(f, "fifty-move rule"),
            DrawReason::Repetition => write!(f, "repetition"),
            DrawReason::InsufficientMaterial => write!(f, "insufficient material"),
            DrawReason::Agreement => write!(f, "agreement"),
        }
    }
}

/// Classification of the game after the latest ply
///
/// Starts as `InProgress`. Once set to a terminal variant, the game rejects
/// further moves, resignations and draw agreements.
///
/// # Examples
///
/// ```rust,ignore
/// let status = game.status();
/// if !status.can_accept() {
///     println!("{} ({})", status.message(), status.result_token());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Game is still in progress and the side to move is not in check
    #[default]
    InProgress,

    /// Side to move is in check and has at least one legal reply
    Check,

    /// Game won by `winner`
    ///
    /// Reached by checkmating the opponent or by the opponent resigning.
    Checkmate { winner: PieceColor },

    /// Side to move has no legal moves and is not in check
    Stalemate,

    /// Game drawn for the given reason
    Draw(DrawReason),
}

impl GameStatus {
    /// True while moves may still be submitted
    pub fn can_accept(&self) -> bool {
        matches!(self, GameStatus::InProgress | GameStatus::Check)
    }

    /// True for checkmate, stalemate and every draw
    pub fn is_terminal(&self) -> bool {
        !self.can_accept()
    }

    /// Get the winner of the game, if there is one
    ///
    /// Returns `None` for draws and for games still being played.
    pub fn winner(&self) -> Option<PieceColor> {
        match self {
            GameStatus::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self, GameStatus::Checkmate { .. })
    }

    /// True for stalemate and every draw reason
    pub fn is_draw(&self) -> bool {
        matches!(self, GameStatus::Stalemate | GameStatus::Draw(_))
    }

    /// Result token used at the end of a transcript
    pub fn result_token(&self) -> &'static str {
        match self {
            GameStatus::Checkmate {
                winner: PieceColor::White,
            } => "1-0",
            GameStatus::Checkmate {
                winner: PieceColor::Black,
            } => "0-1",
            GameStatus::Stalemate | GameStatus::Draw(_) => "1/2-1/2",
            GameStatus::InProgress | GameStatus::Check => "*",
        }
    }

    /// Get a human-readable message describing the game state
    pub fn message(&self) -> &'static str {
        match self {
            GameStatus::InProgress => "Game in progress",
            GameStatus::Check => "Check!",
            GameStatus::Checkmate {
                winner: PieceColor::White,
            } => "White wins by checkmate!",
            GameStatus::Checkmate {
                winner: PieceColor::Black,
            } => "Black wins by checkmate!",
            GameStatus::Stalemate => "Draw by stalemate",
            GameStatus::Draw(DrawReason::FiftyMove) => "Draw by the fifty-move rule",
            GameStatus::Draw(DrawReason::Repetition) => "Draw by repetition",
            GameStatus::Draw(DrawReason::InsufficientMaterial) => "Draw by insufficient material",
            GameStatus::Draw(DrawReason::Agreement) => "Draw by agreement",
        }
    }

    /// Classify the position described by `summary`
    ///
    /// Evaluated for the side about to move, in this order:
    ///
    /// 1. no legal move, in check → `Checkmate` won by the side that just moved
    /// 2. no legal move, not in check → `Stalemate`
    /// 3. in check → `Check`
    /// 4. half-move clock at the fifty-move limit → `Draw(FiftyMove)`
    /// 5. a position count at the repetition limit → `Draw(Repetition)`
    /// 6. insufficient material → `Draw(InsufficientMaterial)`
    /// 7. otherwise `InProgress`
    ///
    /// Terminal states are returned unchanged.
    pub fn next(self, summary: &PositionSummary, settings: &GameSettings) -> GameStatus {
        if self.is_terminal() {
            return self;
        }

        if !summary.has_legal_move {
            return if summary.in_check {
                GameStatus::Checkmate {
                    winner: summary.side_to_move.opposite(),
                }
            } else {
                GameStatus::Stalemate
            };
        }

        if summary.in_check {
            return GameStatus::Check;
        }

        if summary.halfmove_clock >= settings.fifty_move_limit {
            GameStatus::Draw(DrawReason::FiftyMove)
        } else if summary.max_repetitions >= settings.repetition_limit {
            GameStatus::Draw(DrawReason::Repetition)
        } else if summary.insufficient_material {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else {
            GameStatus::InProgress
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Check => write!(f, "check"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::Draw(reason) => write!(f, "draw by {}", reason),
        }
    }
}

/// Facts about a position that drive [`GameStatus::next`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSummary {
    /// Side about to move
    pub side_to_move: PieceColor,
    pub in_check: bool,
    pub has_legal_move: bool,
    /// Plies since the last pawn move or capture
    pub halfmove_clock: u32,
    /// Highest occurrence count of any position in the game
    pub max_repetitions: u32,
    pub insufficient_material: bool,
}

impl PositionSummary {
    /// Inspect `board` from the point of view of `side_to_move`
    ///
    /// # Errors
    ///
    /// [`crate::game::GameError::MissingKing`] when either king is absent,
    /// [`crate::game::GameError::ExtraKing`] when a color has more than one.
    pub fn evaluate(
        board: &BoardState,
        side_to_move: PieceColor,
        last_move: Option<&LastMove>,
        halfmove_clock: u32,
        max_repetitions: u32,
    ) -> GameResult<Self> {
        board.validate_kings()?;
        Ok(Self {
            side_to_move,
            in_check: rules::is_in_check(board, side_to_move)?,
            has_legal_move: rules::has_any_legal_move(board, side_to_move, last_move)?,
            halfmove_clock,
            max_repetitions,
            insufficient_material: rules::is_insufficient_material(board),
        })
    }
}
