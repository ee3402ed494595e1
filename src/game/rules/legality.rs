//! Legality checker - decides whether a candidate move may be played
//!
//! Composes the per-piece rule sets from [`super::piece_moves`] with the
//! board-wide rules that need more context than one piece:
//!
//! 1. a piece must stand on the source square
//! 2. the destination must not hold a friendly piece
//! 3. the piece's rule set must reach the destination, or the move must be one
//!    of the two special cases with their own precondition chains:
//!    - **castling**: king and rook unmoved, squares between them empty, king
//!      not in check, not passing through or landing on an attacked square
//!    - **en passant**: the previous ply was an enemy double pawn push landing
//!      beside the capturer, and the destination is the square it skipped
//! 4. the move is played on a speculative copy of the board; if the mover's
//!    king is attacked afterwards the move is rejected
//!
//! # Speculative Boards
//!
//! Step 4 never touches the caller's board. [`leaves_king_in_check`] clones
//! it, executes the move on the clone, inspects the clone and drops it before
//! returning.
//!
//! # Errors
//!
//! Every function returns `Ok(false)` / `Ok(None)` for an illegal move. `Err`
//! is reserved for broken invariants such as a missing king.

use crate::game::components::{MoveKind, MoveRecord, PieceColor, PieceType};
use crate::game::error::GameResult;
use crate::game::types::Square;

use super::board_state::BoardState;
use super::executor::{castling_rook_squares, execute, ChessMove};
use super::piece_moves::{attacked_squares, candidate_moves, is_promotion_square};

/// The previous ply, as far as en passant is concerned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastMove {
    pub piece_type: PieceType,
    pub color: PieceColor,
    pub from: Square,
    pub to: Square,
}

impl LastMove {
    pub fn is_double_pawn_push(&self) -> bool {
        self.piece_type == PieceType::Pawn
            && self.from.file() == self.to.file()
            && (self.to.rank().index() as i8 - self.from.rank().index() as i8).abs() == 2
    }
}

impl From<&MoveRecord> for LastMove {
    fn from(record: &MoveRecord) -> Self {
        Self {
            piece_type: record.piece_type(),
            color: record.piece_color(),
            from: record.from(),
            to: record.to(),
        }
    }
}

/// True if any piece of color `by` attacks `square`
pub fn is_square_attacked(board: &BoardState, square: Square, by: PieceColor) -> bool {
    board
        .pieces(by)
        .any(|piece| attacked_squares(piece, board).contains(&square))
}

/// True if `color`'s king is attacked
pub fn is_in_check(board: &BoardState, color: PieceColor) -> GameResult<bool> {
    let king = board.require_king(color)?;
    Ok(is_square_attacked(board, king, color.opposite()))
}

/// Play `mv` on a private copy of the board and report whether the mover's
/// king is attacked afterwards
pub fn leaves_king_in_check(board: &BoardState, mv: ChessMove) -> GameResult<bool> {
    let color = match board.piece_at(mv.from) {
        Some(piece) => piece.color,
        None => return Ok(true),
    };

    let mut speculative = board.clone();
    execute(&mut speculative, mv)?;
    is_in_check(&speculative, color)
}

/// Classify the move `from` → `to` if it is legal
///
/// Returns the move's kind, or `None` when it may not be played. Promotions
/// are reported as [`MoveKind::Promotion`]; the promotion piece is the
/// caller's choice and does not affect legality.
pub fn classify(
    board: &BoardState,
    from: Square,
    to: Square,
    last_move: Option<&LastMove>,
) -> GameResult<Option<MoveKind>> {
    // A piece must exist at the source
    let Some(piece) = board.piece_at(from).copied() else {
        return Ok(None);
    };

    // Can't stay put or capture your own pieces
    if from == to || board.get_piece_color(to) == Some(piece.color) {
        return Ok(None);
    }

    let dx = to.file().index() as i8 - from.file().index() as i8;
    let dy = to.rank().index() as i8 - from.rank().index() as i8;

    let kind = if piece.piece_type == PieceType::King && dy == 0 && dx.abs() == 2 {
        match castling_kind(board, from, to, piece.color)? {
            Some(kind) => kind,
            None => return Ok(None),
        }
    } else if piece.piece_type == PieceType::Pawn && dx.abs() == 1 && board.is_empty(to) {
        if !is_en_passant(board, from, to, piece.color, last_move) {
            return Ok(None);
        }
        MoveKind::EnPassant
    } else if candidate_moves(&piece, board).contains(&to) {
        if piece.piece_type == PieceType::Pawn && is_promotion_square(piece.color, to) {
            MoveKind::Promotion
        } else if board.piece_at(to).is_some() {
            MoveKind::Capture
        } else {
            MoveKind::Normal
        }
    } else {
        return Ok(None);
    };

    let mv = match kind {
        MoveKind::Promotion => ChessMove::promoting(from, to, PieceType::Queen),
        _ => ChessMove::new(from, to, kind),
    };

    if leaves_king_in_check(board, mv)? {
        return Ok(None);
    }

    Ok(Some(kind))
}

/// Check if the move `from` → `to` may be played
pub fn is_legal(
    board: &BoardState,
    from: Square,
    to: Square,
    last_move: Option<&LastMove>,
) -> GameResult<bool> {
    Ok(classify(board, from, to, last_move)?.is_some())
}

/// Every legal destination for the piece on `from`, with its move kind
pub fn legal_destinations(
    board: &BoardState,
    from: Square,
    last_move: Option<&LastMove>,
) -> GameResult<Vec<(Square, MoveKind)>> {
    let Some(piece) = board.piece_at(from).copied() else {
        return Ok(Vec::new());
    };

    let mut targets = candidate_moves(&piece, board);
    match piece.piece_type {
        PieceType::King => targets.extend([-2, 2].into_iter().filter_map(|dx| from.offset(dx, 0))),
        PieceType::Pawn => targets.extend(
            [-1, 1]
                .into_iter()
                .filter_map(|dx| from.offset(dx, piece.color.forward()))
                .filter(|square| board.is_empty(*square)),
        ),
        _ => {}
    }

    let mut legal = Vec::new();
    for to in targets {
        if let Some(kind) = classify(board, from, to, last_move)? {
            legal.push((to, kind));
        }
    }
    Ok(legal)
}

/// True if `color` has at least one legal move
pub fn has_any_legal_move(
    board: &BoardState,
    color: PieceColor,
    last_move: Option<&LastMove>,
) -> GameResult<bool> {
    let squares: Vec<Square> = board.pieces(color).map(|piece| piece.square).collect();
    for from in squares {
        if !legal_destinations(board, from, last_move)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// True when neither side can possibly deliver mate: king against king, or
/// king and a single bishop or knight against a lone king
pub fn is_insufficient_material(board: &BoardState) -> bool {
    let mut minors = 0;
    for color in [PieceColor::White, PieceColor::Black] {
        for piece in board.pieces(color) {
            match piece.piece_type {
                PieceType::King => {}
                piece_type if piece_type.is_minor() => minors += 1,
                _ => return false,
            }
        }
    }
    minors <= 1
}

/// Whether an en passant capture by `color` from `from` to `to` is available
///
/// `to` is assumed to be a forward diagonal of `from` and empty.
pub fn is_en_passant(
    board: &BoardState,
    from: Square,
    to: Square,
    color: PieceColor,
    last_move: Option<&LastMove>,
) -> bool {
    let Some(last) = last_move else {
        return false;
    };

    // Previous ply must be an opponent pawn advancing two squares
    if last.color == color || !last.is_double_pawn_push() {
        return false;
    }

    // The advanced pawn must still be there, beside the capturer on its rank
    let advanced = last.to;
    let beside = advanced.rank() == from.rank()
        && (advanced.file().index() as i8 - from.file().index() as i8).abs() == 1;
    let still_there = board
        .piece_at(advanced)
        .is_some_and(|p| p.piece_type == PieceType::Pawn && p.color != color);

    // Destination is the square directly behind the advanced pawn
    beside && still_there && advanced.offset(0, color.forward()) == Some(to)
}

/// Validate a two-file king move as castling
fn castling_kind(
    board: &BoardState,
    from: Square,
    to: Square,
    color: PieceColor,
) -> GameResult<Option<MoveKind>> {
    let kind = if to.file().index() > from.file().index() {
        MoveKind::CastleKingside
    } else {
        MoveKind::CastleQueenside
    };

    // King must be unmoved on its home square
    let home = Square::new(4, color.back_rank())?;
    let king_unmoved = board
        .piece_at(from)
        .is_some_and(|king| from == home && !king.has_moved);
    if !king_unmoved {
        return Ok(None);
    }

    // Rook must be unmoved in its corner
    let Some((rook_square, _)) = castling_rook_squares(from, kind) else {
        return Ok(None);
    };
    let rook_unmoved = board.piece_at(rook_square).is_some_and(|rook| {
        rook.piece_type == PieceType::Rook && rook.color == color && !rook.has_moved
    });
    if !rook_unmoved {
        return Ok(None);
    }

    // Every square strictly between king and rook must be empty
    if !board.path_clear(from, rook_square) {
        return Ok(None);
    }

    // Not out of, through, or into check
    let enemy = color.opposite();
    let step = if kind == MoveKind::CastleKingside { 1 } else { -1 };
    let crossed = from.offset(step, 0);
    let attacked = is_square_attacked(board, from, enemy)
        || crossed.is_some_and(|square| is_square_attacked(board, square, enemy))
        || is_square_attacked(board, to, enemy);
    if attacked {
        return Ok(None);
    }

    Ok(Some(kind))
}
