//! Game Flow Integration Tests
//!
//! Tests for full game flows through the public [`Game`] API including:
//! - Turn alternation
//! - Move submission outcomes (accepted, illegal, malformed)
//! - Special moves (castling, en passant, promotion)
//! - Win conditions and terminal states
//! - Transcript export

use xfchess_rules::game::components::{MoveKind, PieceColor, PieceType};
use xfchess_rules::game::resources::{DrawReason, GameStatus};
use xfchess_rules::game::types::Square;
use xfchess_rules::{Game, GameError, GameSettings};

/// Play coordinate moves such as "e2e4", asserting that each is accepted
fn play(game: &mut Game, moves: &[&str]) {
    for mv in moves {
        let (from, rest) = mv.split_at(2);
        let (to, promotion) = rest.split_at(2);
        let accepted = game
            .submit_move(from, to, promotion.chars().next())
            .unwrap_or_else(|e| panic!("{mv} failed: {e}"));
        assert!(accepted.is_some(), "{mv} should be legal");
    }
}

fn from_fen(fen: &str) -> Game {
    Game::from_fen(fen, GameSettings::default()).unwrap()
}

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

// ============================================================================
// Turn Alternation Tests
// ============================================================================

#[test]
fn test_white_moves_first_and_turns_alternate() {
    let mut game = Game::new();
    assert_eq!(game.side_to_move(), PieceColor::White);

    // Black may not move first
    assert!(game.submit_move("e7", "e5", None).unwrap().is_none());

    play(&mut game, &["e2e4"]);
    assert_eq!(game.side_to_move(), PieceColor::Black);

    // White may not move twice
    assert!(game.submit_move("d2", "d4", None).unwrap().is_none());

    play(&mut game, &["e7e5"]);
    assert_eq!(game.side_to_move(), PieceColor::White);
    assert_eq!(game.turn().move_number, 2);
}

#[test]
fn test_sequence_numbers_increase() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "g1f3"]);

    let sequences: Vec<u32> = game.history().iter().map(|r| r.sequence()).collect();
    assert_eq!(sequences, vec![1, 2, 3]);
}

// ============================================================================
// Rejection Tests
// ============================================================================

#[test]
fn test_illegal_move_leaves_game_unchanged() {
    //! An illegal move is reported as `Ok(None)`: no turn change, no history
    //! entry, no board change
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    let fen_before = game.to_fen();

    for (from, to) in [("e7", "e4"), ("b8", "d7"), ("e8", "e7"), ("d8", "h4"), ("a7", "a4")] {
        assert!(
            game.submit_move(from, to, None).unwrap().is_none(),
            "{from}{to} should be illegal"
        );
    }

    assert_eq!(game.to_fen(), fen_before);
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.side_to_move(), PieceColor::Black);

    // The same player can retry
    play(&mut game, &["e7e5"]);
}

#[test]
fn test_malformed_input_is_an_error() {
    let mut game = Game::new();
    let fen_before = game.to_fen();

    for (from, to) in [("e9", "e4"), ("i2", "i4"), ("E2", "E4"), ("e22", "e4"), ("", "e4"), ("e2", "4e")] {
        assert!(
            matches!(
                game.submit_move(from, to, None),
                Err(GameError::MalformedSquare { .. })
            ),
            "{from:?} {to:?} should be malformed"
        );
    }

    assert_eq!(
        game.submit_move("e2", "e4", Some('k')),
        Err(GameError::InvalidPromotion { piece: 'k' })
    );
    assert_eq!(game.to_fen(), fen_before);
    assert!(game.history().is_empty());
}

#[test]
fn test_king_cannot_move_next_to_enemy_king() {
    let mut game = from_fen("8/8/4k3/8/4K3/8/8/8 w - - 0 1");
    let fen_before = game.to_fen();

    for to in ["d5", "e5", "f5"] {
        assert!(game.submit_move("e4", to, None).unwrap().is_none());
    }
    assert_eq!(game.to_fen(), fen_before);

    play(&mut game, &["e4d4"]);
}

#[test]
fn test_king_cannot_move_into_attacked_square() {
    let mut game = from_fen("3rk3/8/8/8/8/8/8/4K3 w - - 0 1");
    let fen_before = game.to_fen();

    assert!(game.submit_move("e1", "d1", None).unwrap().is_none());
    assert!(game.submit_move("e1", "d2", None).unwrap().is_none());
    assert_eq!(game.to_fen(), fen_before);

    play(&mut game, &["e1f1"]);
}

// ============================================================================
// Special Move Tests
// ============================================================================

#[test]
fn test_castling_kingside_in_play() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"]);

    let record = game.history().last_move().unwrap();
    assert_eq!(record.kind(), MoveKind::CastleKingside);
    assert_eq!(record.notation(), "O-O");

    let board = game.board();
    assert_eq!(board.piece_at(sq("g1")).map(|p| p.piece_type), Some(PieceType::King));
    assert_eq!(board.piece_at(sq("f1")).map(|p| p.piece_type), Some(PieceType::Rook));
    assert!(board.is_empty(sq("h1")));
    assert!(game.to_fen().contains(" b kq "));
}

#[test]
fn test_castling_queenside_for_black() {
    let mut game = Game::new();
    play(
        &mut game,
        &["e2e4", "d7d5", "g1f3", "c8g4", "f1e2", "b8c6", "e1g1", "d8d6", "d2d3", "e8c8"],
    );

    let record = game.history().last_move().unwrap();
    assert_eq!(record.kind(), MoveKind::CastleQueenside);
    assert_eq!(record.notation(), "O-O-O");
    assert_eq!(
        game.board().piece_at(sq("d8")).map(|p| p.piece_type),
        Some(PieceType::Rook)
    );
}

#[test]
fn test_castling_rejected_after_king_returns_home() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1e2", "f8c5", "e2e1", "d7d6"]);

    assert!(game.submit_move("e1", "g1", None).unwrap().is_none());
}

#[test]
fn test_en_passant_in_play() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"]);

    let record = game.history().last_move().unwrap();
    assert_eq!(record.kind(), MoveKind::EnPassant);
    assert_eq!(record.captured(), Some(PieceType::Pawn));
    assert_eq!(record.notation(), "exd6");
    assert!(game.board().is_empty(sq("d5")));
    assert_eq!(game.captured().taken_by(PieceColor::White), &[PieceType::Pawn]);
    assert_eq!(game.halfmove_clock(), 0);
}

#[test]
fn test_en_passant_expires_after_one_ply() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "a6a5"]);

    assert!(game.submit_move("e5", "d6", None).unwrap().is_none());
}

#[test]
fn test_en_passant_from_fen() {
    let mut game = from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
    play(&mut game, &["e5d6"]);
    assert_eq!(game.history().last_move().unwrap().kind(), MoveKind::EnPassant);
}

#[test]
fn test_promotion_defaults_to_queen() {
    let mut game = from_fen("8/P7/8/8/8/7k/8/4K3 w - - 0 1");
    let record = game.submit_move("a7", "a8", None).unwrap().unwrap();

    assert_eq!(record.kind(), MoveKind::Promotion);
    assert_eq!(record.promotion(), Some(PieceType::Queen));
    assert_eq!(record.notation(), "a8=Q");
    assert_eq!(
        game.board().piece_at(sq("a8")).map(|p| (p.piece_type, p.color)),
        Some((PieceType::Queen, PieceColor::White))
    );
}

#[test]
fn test_promotion_honours_choice() {
    let mut game = from_fen("1r6/P7/8/8/8/7k/8/4K3 w - - 0 1");
    let record = game.submit_move("a7", "b8", Some('R')).unwrap().unwrap();

    assert_eq!(record.promotion(), Some(PieceType::Rook));
    assert_eq!(record.captured(), Some(PieceType::Rook));
    assert_eq!(record.notation(), "axb8=R");
}

#[test]
fn test_promotion_default_comes_from_settings() {
    let settings = GameSettings {
        default_promotion: PieceType::Knight,
        ..GameSettings::default()
    };
    let mut game = Game::from_fen("8/P7/8/8/8/7k/8/4K3 w - - 0 1", settings).unwrap();
    let record = game.submit_move("a7", "a8", None).unwrap().unwrap();

    assert_eq!(record.promotion(), Some(PieceType::Knight));
}

#[test]
fn test_promotion_default_must_be_a_promotion_piece() {
    //! A pawn reaching the last rank always becomes a queen, rook, bishop or
    //! knight, so settings naming a king or pawn never reach a game
    for piece in [PieceType::King, PieceType::Pawn] {
        let settings = GameSettings {
            default_promotion: piece,
            ..GameSettings::default()
        };
        assert!(matches!(
            Game::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1", settings),
            Err(GameError::InvalidSettings { .. })
        ));
        assert!(matches!(
            Game::with_settings(settings),
            Err(GameError::InvalidSettings { .. })
        ));
    }

    let settings = GameSettings {
        fifty_move_limit: 0,
        ..GameSettings::default()
    };
    assert!(Game::with_settings(settings).is_err());
}

#[test]
fn test_promotion_choice_ignored_on_ordinary_move() {
    let mut game = from_fen("8/P7/8/8/8/7k/8/4K3 w - - 0 1");
    let record = game.submit_move("e1", "e2", Some('q')).unwrap().unwrap();

    assert_eq!(record.promotion(), None);
    assert_eq!(record.notation(), "Ke2");
}

// ============================================================================
// Terminal State Tests
// ============================================================================

#[test]
fn test_scholars_mate() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"]);

    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: PieceColor::White
        }
    );
    assert!(!game.status().can_accept());

    let last = game.history().last_move().unwrap();
    assert!(last.is_checkmate());
    assert_eq!(last.notation(), "Qxf7#");
    assert_eq!(game.transcript(), "1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0");
}

#[test]
fn test_fools_mate() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: PieceColor::Black
        }
    );
    assert_eq!(game.result_token(), "0-1");
}

#[test]
fn test_moves_rejected_after_game_over() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    let fen_before = game.to_fen();

    assert!(matches!(
        game.submit_move("a2", "a3", None),
        Err(GameError::GameOver { .. })
    ));
    assert!(matches!(game.agree_draw(), Err(GameError::GameOver { .. })));
    assert!(matches!(
        game.resign(PieceColor::White),
        Err(GameError::GameOver { .. })
    ));
    assert_eq!(game.to_fen(), fen_before);
}

#[test]
fn test_check_status_and_suffix() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "f7f6", "d1h5"]);

    assert_eq!(game.status(), GameStatus::Check);
    assert!(game.status().can_accept());
    assert_eq!(game.history().last_move().unwrap().notation(), "Qh5+");

    // Only replies that resolve the check are accepted
    assert!(game.submit_move("a7", "a6", None).unwrap().is_none());
    play(&mut game, &["g7g6"]);
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_stalemate_from_fen() {
    let mut game = from_fen("k7/8/1QK5/8/8/8/8/8 b - - 0 1");

    assert_eq!(game.status(), GameStatus::Stalemate);
    assert!(!game.status().can_accept());
    assert!(matches!(
        game.submit_move("a8", "a7", None),
        Err(GameError::GameOver { .. })
    ));
}

#[test]
fn test_stalemating_move() {
    let mut game = from_fen("k7/8/2K5/1Q6/8/8/8/8 w - - 0 1");
    play(&mut game, &["b5b6"]);

    assert_eq!(game.status(), GameStatus::Stalemate);
    assert_eq!(game.transcript(), "1. Qb6 1/2-1/2");
}

#[test]
fn test_resignation_and_draw_agreement() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    assert_eq!(
        game.resign(PieceColor::Black).unwrap(),
        GameStatus::Checkmate {
            winner: PieceColor::White
        }
    );
    assert_eq!(game.result_token(), "1-0");

    let mut game = Game::new();
    assert_eq!(
        game.agree_draw().unwrap(),
        GameStatus::Draw(DrawReason::Agreement)
    );
    assert_eq!(game.transcript(), "1/2-1/2");
}

// ============================================================================
// Transcript and Query Tests
// ============================================================================

#[test]
fn test_transcript_in_progress() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "g1f3"]);

    assert_eq!(game.transcript(), "1. e4 e5 2. Nf3 *");
}

#[test]
fn test_transcript_starting_with_black() {
    let mut game = from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 12");
    play(&mut game, &["e7e5", "g1f3"]);

    assert_eq!(game.transcript(), "12... e5 13. Nf3 *");
}

#[test]
fn test_legal_moves_from_square() {
    let game = Game::new();

    let mut knight = game.legal_moves_from(sq("g1")).unwrap();
    knight.sort();
    assert_eq!(knight, vec![sq("f3"), sq("h3")]);

    // Black pieces cannot move on White's turn
    assert!(game.legal_moves_from(sq("g8")).unwrap().is_empty());
    assert!(game.legal_moves_from(sq("e4")).unwrap().is_empty());
}

#[test]
fn test_fen_round_trip_through_game() {
    let fen = "r3k2r/pppq1ppp/2npbn2/2b1p3/2B1P3/2NPBN2/PPPQ1PPP/R3K2R w KQkq - 6 8";
    let game = from_fen(fen);
    assert_eq!(game.to_fen(), fen);
}

#[test]
fn test_fen_with_side_not_to_move_in_check_is_rejected() {
    let result = Game::from_fen("4k3/8/8/8/8/8/8/3KR3 b - - 0 1", GameSettings::default());
    assert!(result.is_ok(), "black in check on black's move is fine");

    let result = Game::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1", GameSettings::default());
    assert!(matches!(result, Err(GameError::InvalidFen { .. })));
}
