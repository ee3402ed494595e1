//! Type definitions and utilities for chess game logic
//!
//! Provides newtype patterns and trait implementations for chess-specific types
//! to improve type safety and code clarity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::components::PieceType;
use crate::game::error::{GameError, GameResult};

/// Board coordinate representing a file (column) on the chessboard
///
/// Values range from 0 (file 'a') to 7 (file 'h').
/// This newtype prevents mixing up x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct File(u8);

impl File {
    /// Create a file from a character ('a'..='h')
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let file = File::from_char('e').unwrap(); // File 4
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Convert file to character ('a'..='h')
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Get the file index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for File {
    type Error = GameError;

    fn try_from(value: u8) -> GameResult<Self> {
        if value < 8 {
            Ok(File(value))
        } else {
            Err(GameError::OutOfRange {
                file: value,
                rank: 0,
            })
        }
    }
}

impl From<File> for u8 {
    fn from(file: File) -> Self {
        file.0
    }
}

/// Board coordinate representing a rank (row) on the chessboard
///
/// Values range from 0 (rank 1) to 7 (rank 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    /// Create a rank from a number (1-8)
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let rank = Rank::from_number(4).unwrap(); // Rank 3 (0-indexed)
    /// ```
    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=8).contains(&n) {
            Some(Rank(n - 1))
        } else {
            None
        }
    }

    /// Convert rank to number (1-8)
    pub fn to_number(self) -> u8 {
        self.0 + 1
    }

    /// Get the rank index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rank {
    type Error = GameError;

    fn try_from(value: u8) -> GameResult<Self> {
        if value < 8 {
            Ok(Rank(value))
        } else {
            Err(GameError::OutOfRange {
                file: 0,
                rank: value,
            })
        }
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}

/// Board square position (file, rank)
///
/// Combines File and Rank into a single type-safe coordinate. Squares are
/// immutable values; every constructor validates its input so a `Square`
/// always names one of the 64 cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: File,
    rank: Rank,
}

impl Square {
    /// Create a square from zero-based file and rank indices
    ///
    /// # Errors
    ///
    /// [`GameError::OutOfRange`] when either index is 8 or more.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let square = Square::new(4, 3)?; // e4
    /// ```
    pub fn new(file: u8, rank: u8) -> GameResult<Self> {
        if file > 7 || rank > 7 {
            return Err(GameError::OutOfRange { file, rank });
        }
        Ok(Square {
            file: File(file),
            rank: Rank(rank),
        })
    }

    /// Create a square from a linear index (0 = a1, 7 = h1, 63 = h8)
    pub fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Square {
                file: File((index % 8) as u8),
                rank: Rank((index / 8) as u8),
            })
        } else {
            None
        }
    }

    /// Create a square from algebraic notation (e.g., "e4")
    ///
    /// Accepts exactly one lowercase file letter followed by one rank digit.
    ///
    /// # Errors
    ///
    /// [`GameError::MalformedSquare`] for any other form (`"E4"`, `"e9"`,
    /// `"e44"`, `""`).
    pub fn from_algebraic(s: &str) -> GameResult<Self> {
        let malformed = || GameError::MalformedSquare {
            input: s.to_string(),
        };

        let mut chars = s.chars();
        let file_char = chars.next().ok_or_else(malformed)?;
        let rank_char = chars.next().ok_or_else(malformed)?;
        if chars.next().is_some() {
            return Err(malformed());
        }

        let file = File::from_char(file_char).ok_or_else(malformed)?;
        let rank_num = rank_char.to_digit(10).ok_or_else(malformed)? as u8;
        let rank = Rank::from_number(rank_num).ok_or_else(malformed)?;

        Ok(Square { file, rank })
    }

    /// Convert square to algebraic notation (e.g., "e4")
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file.to_char(), self.rank.to_number())
    }

    pub fn file(self) -> File {
        self.file
    }

    pub fn rank(self) -> Rank {
        self.rank
    }

    /// Linear index 0-63 (a1 = 0, h8 = 63)
    #[inline]
    pub fn index(self) -> usize {
        self.rank.0 as usize * 8 + self.file.0 as usize
    }

    /// Square displaced by a file/rank delta, or `None` when it leaves the board
    #[inline]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file.0 as i8 + file_delta;
        let rank = self.rank.0 as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square {
                file: File(file as u8),
                rank: Rank(rank as u8),
            })
        } else {
            None
        }
    }

    /// Iterate over all 64 squares, a1 first, h8 last
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank.to_number())
    }
}

impl FromStr for Square {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        Square::from_algebraic(s)
    }
}

impl TryFrom<String> for Square {
    type Error = GameError;

    fn try_from(value: String) -> GameResult<Self> {
        Square::from_algebraic(&value)
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_algebraic()
    }
}

/// Piece value in centipawns for material evaluation
///
/// Standard chess piece values:
/// - Pawn: 100 centipawns
/// - Knight/Bishop: 300 centipawns
/// - Rook: 500 centipawns
/// - Queen: 900 centipawns
/// - King: 0 (cannot be captured)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Centipawns(pub i32);

impl Centipawns {
    /// Get the standard value for a piece type
    pub fn for_piece(piece_type: PieceType) -> Self {
        match piece_type {
            PieceType::Pawn => Centipawns(100),
            PieceType::Knight => Centipawns(300),
            PieceType::Bishop => Centipawns(300),
            PieceType::Rook => Centipawns(500),
            PieceType::Queen => Centipawns(900),
            PieceType::King => Centipawns(0), // King cannot be captured
        }
    }

    /// Get the raw centipawn value
    pub fn value(self) -> i32 {
        self.0
    }
}

impl std::ops::Add for Centipawns {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Centipawns(self.0 + other.0)
    }
}

impl std::ops::Sub for Centipawns {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Centipawns(self.0 - other.0)
    }
}

impl std::iter::Sum for Centipawns {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Centipawns(0), |acc, cp| acc + cp)
    }
}
