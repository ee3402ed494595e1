//! Error types for game module
//!
//! Provides custom error types for the rules engine, split along the three
//! failure classes a caller has to tell apart:
//!
//! - **Malformed input** (bad square syntax, unknown promotion letter, bad FEN,
//!   unusable settings):
//!   rejected before any game state is touched
//! - **Game already over**: the request is well-formed but the game is terminal
//! - **Invariant violations** (a color without exactly one king): programming errors in the
//!   executor or legality checker, see [`GameError::is_fatal`]
//!
//! A merely *illegal* move is not an error. Move submission reports it as
//! `Ok(None)` so the same player can retry.

use crate::game::components::PieceColor;
use crate::game::resources::GameStatus;
use crate::game::types::Square;

/// Errors that can occur in game logic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Square notation that is not one file letter followed by one rank digit
    #[error("Malformed square: {input:?} (expected a-h followed by 1-8)")]
    MalformedSquare { input: String },

    /// Square built from zero-based indices outside the board
    #[error("Square out of range: file {file}, rank {rank} (must be 0-7)")]
    OutOfRange { file: u8, rank: u8 },

    /// Promotion letter that does not name a queen, rook, bishop or knight
    #[error("Invalid promotion piece: {piece:?} (expected q, r, b or n)")]
    InvalidPromotion { piece: char },

    /// Rule limits or promotion default that cannot drive a game
    #[error("Invalid game settings: {message}")]
    InvalidSettings { message: String },

    /// Position setup string that could not be parsed
    #[error("Invalid FEN: {message}")]
    InvalidFen { message: String },

    /// Move, resignation or draw submitted after the game ended
    #[error("Game is already over: {status}")]
    GameOver { status: GameStatus },

    /// Board invariant broken: a color has no king
    #[error("Board invariant violated: no {color} king on the board")]
    MissingKing { color: PieceColor },

    /// Board invariant broken: a color has more than one king
    #[error("Board invariant violated: {count} {color} kings on the board")]
    ExtraKing { color: PieceColor, count: usize },

    /// Executor asked to move from an empty square
    #[error("No piece at source square {square}")]
    NoPieceAtSquare { square: Square },
}

impl GameError {
    /// True for invariant violations that indicate a bug rather than bad input
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::MissingKing { .. }
                | GameError::ExtraKing { .. }
                | GameError::NoPieceAtSquare { .. }
        )
    }
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invariant_violations_are_fatal() {
        assert!(GameError::MissingKing {
            color: PieceColor::White
        }
        .is_fatal());
        assert!(!GameError::MalformedSquare {
            input: "z9".to_string()
        }
        .is_fatal());
        assert!(GameError::ExtraKing {
            color: PieceColor::White,
            count: 2
        }
        .is_fatal());
        assert!(!GameError::InvalidPromotion { piece: 'k' }.is_fatal());
        assert!(!GameError::InvalidSettings {
            message: "fifty_move_limit must be at least 1".to_string()
        }
        .is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = GameError::MalformedSquare {
            input: "e9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed square: \"e9\" (expected a-h followed by 1-8)"
        );

        let err = GameError::MissingKing {
            color: PieceColor::Black,
        };
        assert_eq!(
            err.to_string(),
            "Board invariant violated: no black king on the board"
        );

        let err = GameError::ExtraKing {
            color: PieceColor::White,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Board invariant violated: 2 white kings on the board"
        );
    }
}
