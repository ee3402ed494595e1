//! Chess rules module - Pure game logic with no orchestration state
//!
//! Implements chess move validation and board state management using pure functions,
//! allowing easy testing and reuse by any front end that owns a [`crate::game::Game`].
//!
//! # Architecture
//!
//! - **Pure functions** for move validation (easy to unit test)
//! - **Owned BoardState** cloned for speculative what-if checks
//! - **Closed piece enum** dispatched with `match`, so every rule is exhaustive
//!
//! # Module Structure
//!
//! - `piece_moves` - Movement rules for each piece type (pawn, knight, bishop, rook, queen, king)
//! - `board_state` - Board representation, registries and path queries
//! - `executor` - Apply a validated move and take it back
//! - `legality` - King safety, castling, en passant and draw-by-material checks
//!
//! # Data Flow
//!
//! ```text
//! request → legality::classify → executor::execute → (state machine) → history
//! ```

pub mod piece_moves;
pub mod board_state;
pub mod executor;
pub mod legality;


// Re-export commonly used items
pub use board_state::BoardState;
pub use executor::{execute, undo, ChessMove, ExecutedMove};
pub use legality::{
    classify, has_any_legal_move, is_in_check, is_insufficient_material, is_legal,
    is_square_attacked, legal_destinations, LastMove,
};
pub use piece_moves::{attacked_squares, candidate_moves, is_promotion_square};
