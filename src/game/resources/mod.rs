//! Chess game resources - Per-game state owned by a [`crate::game::Game`]
//!
//! Each value here has exactly one instance per game and is mutated only
//! while a ply is being committed (or on resignation / draw agreement).
//!
//! # Resource Categories
//!
//! ## Turn Management
//! - [`CurrentTurn`] - Tracks whose turn it is and move numbers
//!
//! ## Game History
//! - [`MoveHistory`] - Complete move record for transcript export
//! - [`PositionCounts`] - Occurrences of each position, for repetition draws
//! - [`CapturedPieces`] - Material tracking and advantage calculation
//!
//! ## Game Status
//! - [`GameStatus`] - In progress, check, or one of the terminal results
//! - [`PositionSummary`] - Position facts fed to the status transition

pub mod turn;
pub mod history;
pub mod captured;
pub mod game_over;


pub use captured::CapturedPieces;
pub use game_over::{DrawReason, GameStatus, PositionSummary};
pub use history::{MoveHistory, PositionCounts};
pub use turn::CurrentTurn;
