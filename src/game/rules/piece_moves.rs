//! Chess piece movement rules
//!
//! Contains the rules for how each chess piece can move. Each rule set answers
//! two questions for a piece standing on the board:
//!
//! - [`candidate_moves`] - where could it go, ignoring whose turn it is and
//!   whether its own king would be left in check
//! - [`attacked_squares`] - which squares does it attack, used for king safety
//!
//! The two agree for every piece except the pawn, whose attacks are its two
//! forward diagonals whether or not anything stands there. Sliding attack sets
//! also include a friendly blocker (the square is covered), while candidate
//! moves never land on a friendly piece.
//!
//! Castling and en passant depend on game history and are decided by
//! [`super::legality`], not here.
//!
//! Pure functions with no side effects - easy to test.

use crate::game::components::{Piece, PieceColor, PieceType};
use crate::game::types::Square;

use super::board_state::BoardState;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Get all candidate destinations for a piece
///
/// Follows the piece's own movement rule only: the result ignores turn order,
/// self-check, castling and en passant.
pub fn candidate_moves(piece: &Piece, board: &BoardState) -> Vec<Square> {
    let mut moves = Vec::new();
    let from = piece.square;

    match piece.piece_type {
        PieceType::Pawn => pawn_moves(from, piece.color, board, &mut moves),
        PieceType::Knight => step_moves(from, piece.color, &KNIGHT_OFFSETS, board, &mut moves),
        PieceType::King => step_moves(from, piece.color, &KING_OFFSETS, board, &mut moves),
        PieceType::Bishop => {
            slide_moves(from, piece.color, &BISHOP_DIRECTIONS, board, &mut moves)
        }
        PieceType::Rook => slide_moves(from, piece.color, &ROOK_DIRECTIONS, board, &mut moves),
        PieceType::Queen => {
            slide_moves(from, piece.color, &ROOK_DIRECTIONS, board, &mut moves);
            slide_moves(from, piece.color, &BISHOP_DIRECTIONS, board, &mut moves);
        }
    }

    moves
}

/// Get every square a piece attacks
pub fn attacked_squares(piece: &Piece, board: &BoardState) -> Vec<Square> {
    let mut squares = Vec::new();
    let from = piece.square;

    match piece.piece_type {
        PieceType::Pawn => {
            let forward = piece.color.forward();
            squares.extend([-1, 1].into_iter().filter_map(|dx| from.offset(dx, forward)));
        }
        PieceType::Knight => {
            squares.extend(KNIGHT_OFFSETS.iter().filter_map(|&(dx, dy)| from.offset(dx, dy)));
        }
        PieceType::King => {
            squares.extend(KING_OFFSETS.iter().filter_map(|&(dx, dy)| from.offset(dx, dy)));
        }
        PieceType::Bishop => slide_attacks(from, &BISHOP_DIRECTIONS, board, &mut squares),
        PieceType::Rook => slide_attacks(from, &ROOK_DIRECTIONS, board, &mut squares),
        PieceType::Queen => {
            slide_attacks(from, &ROOK_DIRECTIONS, board, &mut squares);
            slide_attacks(from, &BISHOP_DIRECTIONS, board, &mut squares);
        }
    }

    squares
}

/// Whether a pawn of `color` arriving on `square` must promote
pub fn is_promotion_square(color: PieceColor, square: Square) -> bool {
    square.rank().index() == color.promotion_rank()
}

fn pawn_moves(from: Square, color: PieceColor, board: &BoardState, moves: &mut Vec<Square>) {
    let forward = color.forward();

    // Forward move
    if let Some(one) = from.offset(0, forward) {
        if board.is_empty(one) {
            moves.push(one);

            // Double move from starting rank
            if from.rank().index() == color.pawn_rank() {
                if let Some(two) = one.offset(0, forward) {
                    if board.is_empty(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    // Capture diagonally
    for dx in [-1, 1] {
        if let Some(target) = from.offset(dx, forward) {
            if board.get_piece_color(target) == Some(color.opposite()) {
                moves.push(target);
            }
        }
    }
}

fn step_moves(
    from: Square,
    color: PieceColor,
    offsets: &[(i8, i8)],
    board: &BoardState,
    moves: &mut Vec<Square>,
) {
    for &(dx, dy) in offsets {
        if let Some(to) = from.offset(dx, dy) {
            if board.get_piece_color(to) != Some(color) {
                moves.push(to);
            }
        }
    }
}

fn slide_moves(
    from: Square,
    color: PieceColor,
    directions: &[(i8, i8)],
    board: &BoardState,
    moves: &mut Vec<Square>,
) {
    for &(dx, dy) in directions {
        let mut current = from.offset(dx, dy);
        while let Some(to) = current {
            match board.get_piece_color(to) {
                None => moves.push(to),
                Some(blocker) => {
                    if blocker != color {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to.offset(dx, dy);
        }
    }
}

fn slide_attacks(from: Square, directions: &[(i8, i8)], board: &BoardState, squares: &mut Vec<Square>) {
    for &(dx, dy) in directions {
        let mut current = from.offset(dx, dy);
        while let Some(to) = current {
            squares.push(to);
            if !board.is_empty(to) {
                break;
            }
            current = to.offset(dx, dy);
        }
    }
}
