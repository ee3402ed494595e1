//! Move execution - apply a validated move to a board and take it back
//!
//! [`execute`] performs a move the legality checker already accepted: it
//! lifts any captured piece (from the destination, or from behind it for en
//! passant), relocates the mover, brings the rook across for castling,
//! replaces a promoting pawn and marks the mover as moved. The returned
//! [`ExecutedMove`] carries snapshots of everything that changed so that
//! [`undo`] can restore the board exactly: occupancy, piece identities and
//! has-moved flags.
//!
//! Only a single execute/undo pair is supported. There is no multi-level
//! undo stack.
//!
//! # Errors
//!
//! Neither function validates legality. Calling [`execute`] on an empty source
//! square is a caller bug and is reported as [`GameError::NoPieceAtSquare`].

use crate::game::components::{MoveKind, Piece, PieceType};
use crate::game::error::{GameError, GameResult};
use crate::game::types::Square;

use super::board_state::BoardState;

/// A move the legality checker has classified, ready for execution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    /// Replacement piece when `kind` is [`MoveKind::Promotion`]
    pub promotion: Option<PieceType>,
}

impl ChessMove {
    pub fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            kind,
            promotion: None,
        }
    }

    pub fn promoting(from: Square, to: Square, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            kind: MoveKind::Promotion,
            promotion: Some(promotion),
        }
    }
}

/// Everything needed to reverse one executed move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutedMove {
    pub mv: ChessMove,
    /// The mover as it stood before the move (prior square and has-moved flag)
    pub mover: Piece,
    /// The captured piece, carrying the square it was taken on
    pub captured: Option<Piece>,
    /// The castling rook as it stood before the move
    pub rook: Option<Piece>,
}

/// Rook origin and destination for a castling king move
pub(crate) fn castling_rook_squares(king_from: Square, kind: MoveKind) -> Option<(Square, Square)> {
    let rank = king_from.rank().index();
    let (rook_file, rook_target_file) = match kind {
        MoveKind::CastleKingside => (7, 5),
        MoveKind::CastleQueenside => (0, 3),
        _ => return None,
    };
    Some((
        Square::new(rook_file, rank).ok()?,
        Square::new(rook_target_file, rank).ok()?,
    ))
}

/// Square of the pawn removed by an en passant capture
pub(crate) fn en_passant_victim(from: Square, to: Square) -> Option<Square> {
    Square::new(to.file().index(), from.rank().index()).ok()
}

/// Apply `mv` to `board`
pub fn execute(board: &mut BoardState, mv: ChessMove) -> GameResult<ExecutedMove> {
    let mover = *board
        .piece_at(mv.from)
        .ok_or(GameError::NoPieceAtSquare { square: mv.from })?;

    let captured = match mv.kind {
        MoveKind::EnPassant => {
            en_passant_victim(mv.from, mv.to).and_then(|victim| board.remove(victim))
        }
        _ => board.remove(mv.to),
    };

    board.move_piece(mv.from, mv.to);

    let mut rook = None;
    if let Some((rook_from, rook_to)) = castling_rook_squares(mv.from, mv.kind) {
        rook = board.piece_at(rook_from).copied();
        board.move_piece(rook_from, rook_to);
        board.set_has_moved(rook_to, true);
    }

    if let Some(promotion) = mv.promotion {
        board.spawn(mv.to, promotion, mover.color);
    }

    board.set_has_moved(mv.to, true);

    Ok(ExecutedMove {
        mv,
        mover,
        captured,
        rook,
    })
}

/// Reverse a move previously applied by [`execute`] on the same board
pub fn undo(board: &mut BoardState, executed: &ExecutedMove) {
    let mv = executed.mv;

    // Lifting the destination also discards a promoted piece
    board.remove(mv.to);
    board.place(executed.mover.square, Some(executed.mover));

    if let Some(rook) = executed.rook {
        if let Some((_, rook_to)) = castling_rook_squares(mv.from, mv.kind) {
            board.remove(rook_to);
        }
        board.place(rook.square, Some(rook));
    }

    if let Some(captured) = executed.captured {
        board.place(captured.square, Some(captured));
    }
}
