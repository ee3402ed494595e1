//! Forsyth-Edwards Notation and position keys
//!
//! FEN sets up arbitrary positions for tests and analysis, and exports the
//! current position. It is a position notation only; game history does not
//! survive a round trip.
//!
//! The board stores has-moved flags rather than castling rights, so the
//! castling field is mapped onto the kings and rooks: a right leaves its king
//! and rook unmoved, every other king and rook is marked moved. The en passant
//! field is turned back into the double pawn push that produced it.
//!
//! [`position_key`] hashes exactly what makes two positions the same for
//! repetition purposes: placement, side to move, castling rights and an en
//! passant square that a legal capture can use.

use std::fmt;
use std::sync::OnceLock;

use crate::game::components::{MoveKind, PieceColor, PieceType};
use crate::game::error::{GameError, GameResult};
use crate::game::rules::{self, BoardState, LastMove};
use crate::game::types::Square;

/// FEN of the standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Everything a FEN string describes
#[derive(Debug, Clone)]
pub struct FenPosition {
    pub board: BoardState,
    pub side_to_move: PieceColor,
    /// Double pawn push implied by the en passant field
    pub last_move: Option<LastMove>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// Castling availability derived from has-moved flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    /// Rights still available on `board`: king and rook unmoved on their home squares
    pub fn from_board(board: &BoardState) -> Self {
        let side = |color: PieceColor, rook_file: u8| {
            let rank = color.back_rank();
            let unmoved = |file: u8, piece_type: PieceType| {
                Square::new(file, rank)
                    .ok()
                    .and_then(|square| board.piece_at(square))
                    .is_some_and(|p| p.piece_type == piece_type && p.color == color && !p.has_moved)
            };
            unmoved(4, PieceType::King) && unmoved(rook_file, PieceType::Rook)
        };

        Self {
            white_kingside: side(PieceColor::White, 7),
            white_queenside: side(PieceColor::White, 0),
            black_kingside: side(PieceColor::Black, 7),
            black_queenside: side(PieceColor::Black, 0),
        }
    }

    fn flags(self) -> [bool; 4] {
        [
            self.white_kingside,
            self.white_queenside,
            self.black_kingside,
            self.black_queenside,
        ]
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;
        for (flag, letter) in self.flags().into_iter().zip(['K', 'Q', 'k', 'q']) {
            if flag {
                write!(f, "{letter}")?;
                any = true;
            }
        }
        if !any {
            write!(f, "-")?;
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> GameError {
    GameError::InvalidFen {
        message: message.into(),
    }
}

/// Parse a FEN string
///
/// The halfmove and fullmove fields may be omitted and default to `0` and `1`.
///
/// # Errors
///
/// [`GameError::InvalidFen`] for any syntax error, a color without exactly
/// one king, pawns on the first or last rank, castling rights whose king or
/// rook is not on its home square, or an en passant square no double push
/// could have produced.
pub fn parse_fen(fen: &str) -> GameResult<FenPosition> {
    let mut parts = fen.split_whitespace();
    let placement = parts
        .next()
        .ok_or_else(|| invalid("missing piece placement field"))?;
    let active = parts
        .next()
        .ok_or_else(|| invalid("missing active color field"))?;
    let castling = parts
        .next()
        .ok_or_else(|| invalid("missing castling rights field"))?;
    let en_passant = parts
        .next()
        .ok_or_else(|| invalid("missing en passant field"))?;
    let halfmove_field = parts.next();
    let fullmove_field = parts.next();
    if parts.next().is_some() {
        return Err(invalid("extra fields"));
    }

    let mut board = parse_placement(placement)?;

    let side_to_move = match active {
        "w" => PieceColor::White,
        "b" => PieceColor::Black,
        value => return Err(invalid(format!("invalid active color '{value}'"))),
    };

    apply_castling(castling, &mut board)?;
    let last_move = parse_en_passant(en_passant, side_to_move, &board)?;

    let halfmove_clock = match halfmove_field {
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| invalid(format!("invalid halfmove clock '{value}'")))?,
        None => 0,
    };
    let fullmove_number = match fullmove_field {
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| invalid(format!("invalid fullmove number '{value}'")))?,
        None => 1,
    };
    if fullmove_number == 0 {
        return Err(invalid("fullmove number must be at least 1"));
    }

    Ok(FenPosition {
        board,
        side_to_move,
        last_move,
        halfmove_clock,
        fullmove_number,
    })
}

fn parse_placement(field: &str) -> GameResult<BoardState> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("piece placement must have 8 ranks"));
    }

    let mut board = BoardState::empty();
    let mut kings = [0u32; 2];

    // FEN lists rank 8 first
    for (rank, row) in (0..8u8).rev().zip(ranks) {
        let mut file = 0u8;
        for ch in row.chars() {
            if let Some(skip) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as u8;
                continue;
            }

            let piece_type = PieceType::from_letter(ch)
                .ok_or_else(|| invalid(format!("invalid piece character '{ch}'")))?;
            let color = if ch.is_ascii_uppercase() {
                PieceColor::White
            } else {
                PieceColor::Black
            };
            if file >= 8 {
                return Err(invalid(format!("rank {} has more than 8 squares", rank + 1)));
            }
            if piece_type == PieceType::Pawn && (rank == 0 || rank == 7) {
                return Err(invalid(format!("pawn on rank {}", rank + 1)));
            }

            let square = Square::new(file, rank)?;
            board.spawn(square, piece_type, color);
            match piece_type {
                PieceType::King => {
                    kings[color.index()] += 1;
                    board.set_has_moved(square, true);
                }
                PieceType::Rook => board.set_has_moved(square, true),
                PieceType::Pawn => board.set_has_moved(square, rank != color.pawn_rank()),
                _ => {}
            }
            file += 1;
        }

        if file != 8 {
            return Err(invalid(format!("rank {} must have 8 squares", rank + 1)));
        }
    }

    for color in [PieceColor::White, PieceColor::Black] {
        if kings[color.index()] != 1 {
            return Err(invalid(format!(
                "{} must have exactly one king, found {}",
                color,
                kings[color.index()]
            )));
        }
    }

    Ok(board)
}

/// Clear the has-moved flag of the king and rook behind each castling right
fn apply_castling(field: &str, board: &mut BoardState) -> GameResult<()> {
    if field == "-" {
        return Ok(());
    }

    for ch in field.chars() {
        let (color, rook_file) = match ch {
            'K' => (PieceColor::White, 7),
            'Q' => (PieceColor::White, 0),
            'k' => (PieceColor::Black, 7),
            'q' => (PieceColor::Black, 0),
            _ => return Err(invalid(format!("invalid castling flag '{ch}'"))),
        };

        let rank = color.back_rank();
        for (file, piece_type) in [(4, PieceType::King), (rook_file, PieceType::Rook)] {
            let square = Square::new(file, rank)?;
            let home = board
                .piece_at(square)
                .is_some_and(|p| p.piece_type == piece_type && p.color == color);
            if !home {
                return Err(invalid(format!(
                    "castling right '{ch}' without {} {:?} on {}",
                    color, piece_type, square
                )));
            }
            board.set_has_moved(square, false);
        }
    }

    Ok(())
}

/// Rebuild the double pawn push behind an en passant target square
fn parse_en_passant(
    field: &str,
    side_to_move: PieceColor,
    board: &BoardState,
) -> GameResult<Option<LastMove>> {
    if field == "-" {
        return Ok(None);
    }

    let target = Square::from_algebraic(field)
        .map_err(|_| invalid(format!("invalid en passant square '{field}'")))?;

    // The pusher is the side that just moved
    let pusher = side_to_move.opposite();
    let expected_rank = (pusher.pawn_rank() as i8 + pusher.forward()) as u8;
    if target.rank().index() != expected_rank || !board.is_empty(target) {
        return Err(invalid(format!("impossible en passant square '{field}'")));
    }

    let from = target.offset(0, -pusher.forward());
    let to = target.offset(0, pusher.forward());
    let (Some(from), Some(to)) = (from, to) else {
        return Err(invalid(format!("impossible en passant square '{field}'")));
    };
    let pawn_there = board
        .piece_at(to)
        .is_some_and(|p| p.piece_type == PieceType::Pawn && p.color == pusher);
    if !pawn_there || !board.is_empty(from) {
        return Err(invalid(format!(
            "no {pusher} pawn could have just passed '{field}'"
        )));
    }

    Ok(Some(LastMove {
        piece_type: PieceType::Pawn,
        color: pusher,
        from,
        to,
    }))
}

/// Export a position as FEN
pub fn to_fen(
    board: &BoardState,
    side_to_move: PieceColor,
    last_move: Option<&LastMove>,
    halfmove_clock: u32,
    fullmove_number: u32,
) -> String {
    let mut placement = String::new();
    for rank in (0..8u8).rev() {
        let mut empty = 0;
        for file in 0..8u8 {
            let piece = Square::new(file, rank)
                .ok()
                .and_then(|square| board.piece_at(square));
            match piece {
                Some(piece) => {
                    if empty > 0 {
                        placement.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placement.push(piece.fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            placement.push_str(&empty.to_string());
        }
        if rank > 0 {
            placement.push('/');
        }
    }

    let active = match side_to_move {
        PieceColor::White => 'w',
        PieceColor::Black => 'b',
    };

    let en_passant = en_passant_target(last_move)
        .map(|square| square.to_algebraic())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{} {} {} {} {} {}",
        placement,
        active,
        CastlingRights::from_board(board),
        en_passant,
        halfmove_clock,
        fullmove_number
    )
}

/// Square skipped by the previous ply, if it was a double pawn push
pub fn en_passant_target(last_move: Option<&LastMove>) -> Option<Square> {
    let last = last_move.filter(|m| m.is_double_pawn_push())?;
    last.from.offset(0, last.color.forward())
}

// ============================================================================
// Position keys
// ============================================================================

struct ZobristKeys {
    pieces: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 4],
    en_passant: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = SplitMix64 {
            state: 0x5846_4348_4553_5321,
        };

        let mut pieces = [[[0_u64; 64]; 6]; 2];
        for color in pieces.iter_mut() {
            for kind in color.iter_mut() {
                for key in kind.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }

        let mut castling = [0_u64; 4];
        for entry in &mut castling {
            *entry = rng.next_u64();
        }

        let mut en_passant = [0_u64; 8];
        for entry in &mut en_passant {
            *entry = rng.next_u64();
        }

        Self {
            pieces,
            side_to_move: rng.next_u64(),
            castling,
            en_passant,
        }
    }
}

struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
    KEYS.get_or_init(ZobristKeys::new)
}

fn kind_index(piece_type: PieceType) -> usize {
    match piece_type {
        PieceType::Pawn => 0,
        PieceType::Knight => 1,
        PieceType::Bishop => 2,
        PieceType::Rook => 3,
        PieceType::Queen => 4,
        PieceType::King => 5,
    }
}

/// Hash identifying a position for repetition counting
///
/// The en passant file only contributes when a pawn of the side to move can
/// legally capture onto the target square, so a pinned neighbour does not
/// create a distinct position.
pub fn position_key(
    board: &BoardState,
    side_to_move: PieceColor,
    last_move: Option<&LastMove>,
) -> u64 {
    let keys = zobrist_keys();
    let mut key = 0u64;

    for color in [PieceColor::White, PieceColor::Black] {
        for piece in board.pieces(color) {
            key ^= keys.pieces[color.index()][kind_index(piece.piece_type)][piece.square.index()];
        }
    }

    if side_to_move == PieceColor::Black {
        key ^= keys.side_to_move;
    }

    for (flag, castle_key) in CastlingRights::from_board(board)
        .flags()
        .into_iter()
        .zip(keys.castling)
    {
        if flag {
            key ^= castle_key;
        }
    }

    if let (Some(target), Some(last)) = (en_passant_target(last_move), last_move) {
        let capturable = [-1, 1]
            .into_iter()
            .filter_map(|dx| last.to.offset(dx, 0))
            .filter(|&square| {
                board
                    .piece_at(square)
                    .is_some_and(|p| p.piece_type == PieceType::Pawn && p.color == side_to_move)
            })
            .any(|square| {
                matches!(
                    rules::classify(board, square, target, last_move),
                    Ok(Some(MoveKind::EnPassant))
                )
            });
        if capturable {
            key ^= keys.en_passant[target.file().index() as usize];
        }
    }

    key
}
