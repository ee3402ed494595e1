//! XFChess rules engine
//!
//! Board representation, move legality, check / checkmate / stalemate
//! detection and draw rules for a game of chess, with no rendering or I/O
//! beyond reading an optional settings file.
//!
//! Start with [`game::Game`].

pub mod core;
pub mod game;

pub use crate::core::GameSettings;
pub use crate::game::components::{MoveKind, MoveRecord, PieceColor, PieceType};
pub use crate::game::resources::{DrawReason, GameStatus};
pub use crate::game::types::Square;
pub use crate::game::{Game, GameError, GameResult, MoveRequest};
