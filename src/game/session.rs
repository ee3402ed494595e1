//! Game session - the move-submission entry point
//!
//! A [`Game`] owns one authoritative [`BoardState`] together with everything
//! the rules need beyond the board: whose turn it is, the move history, the
//! position repetition table, the half-move clock, captured material and the
//! current [`GameStatus`]. There is no global game; callers create and own
//! as many as they need.
//!
//! # Ply Pipeline
//!
//! ```text
//! MoveRequest ──► status accepts moves? ──no──► Err(GameOver)
//!                      │ yes
//!                      ▼
//!                 legality::classify ──illegal──► Ok(None), nothing changes
//!                      │ legal
//!                      ▼
//!                 executor::execute (authoritative board)
//!                      │
//!                      ▼
//!                 PositionSummary → GameStatus::next
//!                      │
//!                      ▼
//!                 MoveRecord appended to history ──► Ok(Some(record))
//! ```
//!
//! A move is accepted or rejected as a whole. If evaluating the new position
//! uncovers a broken board invariant, the move is taken back before the error
//! is returned.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{CoreError, GameSettings};
use crate::game::components::{Disambiguation, MoveKind, MoveRecord, PieceColor, PieceType};
use crate::game::error::{GameError, GameResult};
use crate::game::fen::{self, FenPosition};
use crate::game::resources::{
    CapturedPieces, CurrentTurn, DrawReason, GameStatus, MoveHistory, PositionCounts, PositionSummary,
};
use crate::game::rules::{self, BoardState, ChessMove, LastMove};
use crate::game::types::Square;

/// One side of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: PieceColor,
    pub name: String,
}

/// A request to play a move, already parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    /// Promotion choice; ignored when the move does not promote
    pub promotion: Option<PieceType>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Parse two squares in algebraic notation plus an optional promotion letter
    ///
    /// # Errors
    ///
    /// [`GameError::MalformedSquare`] or [`GameError::InvalidPromotion`].
    pub fn parse(from: &str, to: &str, promotion: Option<char>) -> GameResult<Self> {
        Ok(Self {
            from: Square::from_algebraic(from)?,
            to: Square::from_algebraic(to)?,
            promotion: promotion.map(PieceType::from_promotion_char).transpose()?,
        })
    }

    /// Parse coordinate notation such as `e2e4` or `e7e8q`
    pub fn from_coordinates(text: &str) -> GameResult<Self> {
        let malformed = || GameError::MalformedSquare {
            input: text.to_string(),
        };
        if !(4..=5).contains(&text.len()) {
            return Err(malformed());
        }
        let from = text.get(0..2).ok_or_else(malformed)?;
        let to = text.get(2..4).ok_or_else(malformed)?;
        let promotion = text.get(4..).ok_or_else(malformed)?.chars().next();
        Self::parse(from, to, promotion)
    }
}

/// A chess game from the first ply to its result
#[derive(Debug, Clone)]
pub struct Game {
    board: BoardState,
    players: [Player; 2],
    turn: CurrentTurn,
    /// Turn at which the game started, for transcript numbering
    start_turn: CurrentTurn,
    history: MoveHistory,
    positions: PositionCounts,
    halfmove_clock: u32,
    captured: CapturedPieces,
    status: GameStatus,
    settings: GameSettings,
    last_move: Option<LastMove>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// New game from the standard starting position with default settings
    pub fn new() -> Self {
        Self::start(GameSettings::default())
    }

    /// New game from the standard starting position
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidSettings`] when the settings fail
    /// [`GameSettings::validate`].
    pub fn with_settings(settings: GameSettings) -> GameResult<Self> {
        check_settings(&settings)?;
        Ok(Self::start(settings))
    }

    fn start(settings: GameSettings) -> Self {
        let board = BoardState::standard();
        let mut positions = PositionCounts::default();
        positions.record(fen::position_key(&board, PieceColor::White, None));

        Self {
            board,
            players: default_players(),
            turn: CurrentTurn::default(),
            start_turn: CurrentTurn::default(),
            history: MoveHistory::default(),
            positions,
            halfmove_clock: 0,
            captured: CapturedPieces::default(),
            status: GameStatus::InProgress,
            settings,
            last_move: None,
        }
    }

    /// Game starting from a FEN position
    ///
    /// The position is classified immediately, so a mated or stalemated
    /// setup starts out terminal.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidFen`] for unparsable FEN and for positions where
    /// the side that just moved is in check, [`GameError::InvalidSettings`]
    /// for settings that fail validation.
    pub fn from_fen(fen_str: &str, settings: GameSettings) -> GameResult<Self> {
        check_settings(&settings)?;

        let FenPosition {
            board,
            side_to_move,
            last_move,
            halfmove_clock,
            fullmove_number,
        } = fen::parse_fen(fen_str)?;

        if rules::is_in_check(&board, side_to_move.opposite())? {
            return Err(GameError::InvalidFen {
                message: format!("{} is in check but it is not their move", side_to_move.opposite()),
            });
        }

        let mut positions = PositionCounts::default();
        let repetitions =
            positions.record(fen::position_key(&board, side_to_move, last_move.as_ref()));
        let summary = PositionSummary::evaluate(
            &board,
            side_to_move,
            last_move.as_ref(),
            halfmove_clock,
            repetitions,
        )?;
        let status = GameStatus::InProgress.next(&summary, &settings);

        let turn = CurrentTurn {
            color: side_to_move,
            move_number: fullmove_number,
        };
        info!("[GAME] New game from FEN {:?}, status {}", fen_str, status);

        Ok(Self {
            board,
            players: default_players(),
            turn,
            start_turn: turn,
            history: MoveHistory::default(),
            positions,
            halfmove_clock,
            captured: CapturedPieces::default(),
            status,
            settings,
            last_move,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn side_to_move(&self) -> PieceColor {
        self.turn.color
    }

    pub fn turn(&self) -> CurrentTurn {
        self.turn
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    pub fn player(&self, color: PieceColor) -> &Player {
        &self.players[color.index()]
    }

    /// How many times the current position has occurred, including now
    pub fn repetition_count(&self) -> u32 {
        self.positions
            .count(fen::position_key(&self.board, self.turn.color, self.last_move.as_ref()))
    }

    /// Result token for the current status (`*` while in progress)
    pub fn result_token(&self) -> &'static str {
        self.status.result_token()
    }

    /// Current position as FEN
    pub fn to_fen(&self) -> String {
        fen::to_fen(
            &self.board,
            self.turn.color,
            self.last_move.as_ref(),
            self.halfmove_clock,
            self.turn.move_number,
        )
    }

    /// Legal destinations for the piece on `from`
    ///
    /// Empty when the square is empty, holds a piece of the side not to move,
    /// or the game is over.
    pub fn legal_moves_from(&self, from: Square) -> GameResult<Vec<Square>> {
        if !self.status.can_accept() || self.board.get_piece_color(from) != Some(self.turn.color) {
            return Ok(Vec::new());
        }
        Ok(rules::legal_destinations(&self.board, from, self.last_move.as_ref())?
            .into_iter()
            .map(|(to, _)| to)
            .collect())
    }

    /// Every legal move for the side to move, as `(from, to)` pairs
    pub fn legal_moves(&self) -> GameResult<Vec<(Square, Square)>> {
        let squares: Vec<Square> = self
            .board
            .pieces(self.turn.color)
            .map(|piece| piece.square)
            .collect();

        let mut moves = Vec::new();
        for from in squares {
            for to in self.legal_moves_from(from)? {
                moves.push((from, to));
            }
        }
        Ok(moves)
    }

    /// Move-number-prefixed SAN transcript ending in the result token
    ///
    /// ```text
    /// 1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0
    /// ```
    pub fn transcript(&self) -> String {
        let mut parts = Vec::with_capacity(self.history.len() + 1);
        let mut turn = self.start_turn;

        for (index, record) in self.history.iter().enumerate() {
            match turn.color {
                PieceColor::White => {
                    parts.push(format!("{}. {}", turn.move_number, record.notation()))
                }
                PieceColor::Black if index == 0 => {
                    parts.push(format!("{}... {}", turn.move_number, record.notation()))
                }
                PieceColor::Black => parts.push(record.notation().to_string()),
            }
            turn.switch();
        }

        parts.push(self.result_token().to_string());
        parts.join(" ")
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Attempt a move given as algebraic squares and an optional promotion letter
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` - the move was played
    /// - `Ok(None)` - the move is illegal; nothing changed and the same
    ///   player may try again
    ///
    /// # Errors
    ///
    /// Malformed squares or promotion letters, a terminal game, or a broken
    /// board invariant.
    pub fn submit_move(
        &mut self,
        from: &str,
        to: &str,
        promotion: Option<char>,
    ) -> GameResult<Option<MoveRecord>> {
        let request = MoveRequest::parse(from, to, promotion)?;
        self.submit(request)
    }

    /// Attempt a parsed move, see [`Game::submit_move`]
    pub fn submit(&mut self, request: MoveRequest) -> GameResult<Option<MoveRecord>> {
        if let Some(piece) = request.promotion {
            if !piece.is_promotion_target() {
                return Err(GameError::InvalidPromotion {
                    piece: piece.letter().to_ascii_lowercase(),
                });
            }
        }

        if !self.status.can_accept() {
            return Err(GameError::GameOver {
                status: self.status,
            });
        }

        let MoveRequest { from, to, .. } = request;
        let color = self.turn.color;

        let Some(mover) = self.board.piece_at(from).copied() else {
            debug!("[GAME] Rejected {}{}: no piece on {}", from, to, from);
            return Ok(None);
        };
        if mover.color != color {
            debug!("[GAME] Rejected {}{}: it is {}'s turn", from, to, color);
            return Ok(None);
        }

        let Some(kind) = rules::classify(&self.board, from, to, self.last_move.as_ref())? else {
            debug!("[GAME] Rejected {}{}: illegal for {}", from, to, color);
            return Ok(None);
        };

        let promotion = match kind {
            MoveKind::Promotion => Some(request.promotion.unwrap_or(self.settings.default_promotion)),
            _ => {
                if request.promotion.is_some() {
                    debug!("[GAME] Ignoring promotion choice on non-promoting move {}{}", from, to);
                }
                None
            }
        };

        let disambiguation = self.disambiguate(from, to, mover.piece_type)?;

        let mv = match promotion {
            Some(piece) => ChessMove::promoting(from, to, piece),
            None => ChessMove::new(from, to, kind),
        };
        let executed = rules::execute(&mut self.board, mv)?;

        // Everything below is computed before anything but the board changes
        let next_color = color.opposite();
        let last_move = LastMove {
            piece_type: mover.piece_type,
            color,
            from,
            to,
        };
        let halfmove_clock = if mover.piece_type == PieceType::Pawn || executed.captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };
        let key = fen::position_key(&self.board, next_color, Some(&last_move));
        let occurrences = self.positions.count(key) + 1;
        let max_repetitions = occurrences.max(self.positions.max_count());

        let summary = match PositionSummary::evaluate(
            &self.board,
            next_color,
            Some(&last_move),
            halfmove_clock,
            max_repetitions,
        ) {
            Ok(summary) => summary,
            Err(e) => {
                rules::undo(&mut self.board, &executed);
                return Err(e);
            }
        };

        let status = self.status.next(&summary, &self.settings);
        let is_checkmate = summary.in_check && !summary.has_legal_move;

        let record = MoveRecord::new(
            self.history.len() as u32 + 1,
            &executed.mover,
            from,
            to,
            kind,
        )
        .with_capture(executed.captured.map(|p| p.piece_type))
        .with_promotion(promotion)
        .with_disambiguation(disambiguation)
        .with_flags(summary.in_check, is_checkmate);

        // Commit
        if let Some(victim) = executed.captured {
            self.captured.add_capture(victim.color, victim.piece_type);
        }
        self.positions.record(key);
        self.halfmove_clock = halfmove_clock;
        self.last_move = Some(last_move);
        self.turn.switch();
        self.history.add_move(record.clone());

        info!(
            "[GAME] {} played {} (ply {})",
            color,
            record.notation(),
            record.sequence()
        );
        if status != self.status {
            info!("[GAME] Status: {} -> {}", self.status, status);
        }
        self.status = status;

        Ok(Some(record))
    }

    /// `color` resigns; the opponent wins
    pub fn resign(&mut self, color: PieceColor) -> GameResult<GameStatus> {
        self.end_by_decision(GameStatus::Checkmate {
            winner: color.opposite(),
        })
    }

    /// Both players agree to a draw
    pub fn agree_draw(&mut self) -> GameResult<GameStatus> {
        self.end_by_decision(GameStatus::Draw(DrawReason::Agreement))
    }

    /// Take back the last move
    ///
    /// Not supported: only the internal single execute/undo pair exists.
    /// Always returns `false` and leaves the game unchanged.
    pub fn undo_last_move(&mut self) -> bool {
        warn!("[GAME] Undo is not supported; game left unchanged");
        false
    }

    fn end_by_decision(&mut self, status: GameStatus) -> GameResult<GameStatus> {
        if !self.status.can_accept() {
            return Err(GameError::GameOver {
                status: self.status,
            });
        }
        info!("[GAME] Status: {} -> {}", self.status, status);
        self.status = status;
        Ok(status)
    }

    /// How much of `from` SAN needs, given the other like pieces that could
    /// also legally reach `to`
    fn disambiguate(
        &self,
        from: Square,
        to: Square,
        piece_type: PieceType,
    ) -> GameResult<Disambiguation> {
        if matches!(piece_type, PieceType::Pawn | PieceType::King) {
            return Ok(Disambiguation::None);
        }

        let rivals: Vec<Square> = self
            .board
            .pieces(self.turn.color)
            .filter(|p| p.piece_type == piece_type && p.square != from)
            .map(|p| p.square)
            .collect();

        let mut contenders = Vec::new();
        for square in rivals {
            if rules::is_legal(&self.board, square, to, self.last_move.as_ref())? {
                contenders.push(square);
            }
        }

        Ok(if contenders.is_empty() {
            Disambiguation::None
        } else if contenders.iter().all(|s| s.file() != from.file()) {
            Disambiguation::File
        } else if contenders.iter().all(|s| s.rank() != from.rank()) {
            Disambiguation::Rank
        } else {
            Disambiguation::Square
        })
    }
}

fn check_settings(settings: &GameSettings) -> GameResult<()> {
    settings.validate().map_err(|e| {
        warn!("[SETTINGS] Rejected game settings: {}", e);
        let message = match e {
            CoreError::InvalidSettings { message } => message,
            other => other.to_string(),
        };
        GameError::InvalidSettings { message }
    })
}

fn default_players() -> [Player; 2] {
    [
        Player {
            color: PieceColor::White,
            name: "White".to_string(),
        },
        Player {
            color: PieceColor::Black,
            name: "Black".to_string(),
        },
    ]
}
