//! Chess game logic module - rules, state and the move-submission entry point
//!
//! Separates pure chess rules from the per-game state that drives them.
//!
//! # Module Organization
//!
//! - `types` - Square, File, Rank and Centipawns value types
//! - `components` - Piece data and move records
//! - `rules` - Pure chess logic (piece movement, board state, execution, legality)
//! - `resources` - Per-game state (turn, history, repetition table, captures, status)
//! - `fen` - Position setup and export, position keys
//! - `session` - [`Game`], which owns all of the above and accepts moves
//! - `error` - [`GameError`] and [`GameResult`]
//!
//! # Example
//!
//! ```rust,ignore
//! let mut game = Game::new();
//! game.submit_move("e2", "e4", None)?;
//! game.submit_move("e7", "e5", None)?;
//! assert_eq!(game.transcript(), "1. e4 e5 *");
//! ```

pub mod components;
pub mod error;
pub mod fen;
pub mod resources;
pub mod rules;
pub mod session;
pub mod types;

pub use error::{GameError, GameResult};
pub use session::{Game, MoveRequest, Player};
