// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    pawn_push = { "e4", Notation::Algebraic },
    knight = { "Nf3", Notation::Algebraic },
    capture = { "cxd4", Notation::Algebraic },
    castle = { "O-O", Notation::Algebraic },
    long_castle_check = { "O-O-O+", Notation::Algebraic },
    promotion = { "e8=Q#", Notation::Algebraic },
    coordinate = { "e2e4", Notation::Coordinate },
    coordinate_promotion = { "a7a8q", Notation::Coordinate },
    padded = { "  Nf3 ", Notation::Algebraic },
)]
fn recognizes_both_families(text: &str, expected: Notation) {
    let parsed = ScriptedRules::new().parse(text).unwrap();
    assert_eq!(parsed.notation, expected);
    assert_eq!(parsed.text, text.trim());
}

#[parameterized(
    empty = { "" },
    prose = { "knight to f3" },
    off_board = { "i9" },
    bad_promotion = { "e8=K" },
    bad_coordinate = { "e2e9" },
)]
fn rejects_unrecognized(text: &str) {
    let err = ScriptedRules::new().parse(text).unwrap_err();
    assert!(err.to_string().contains("is not a recognised move"));
    assert!(err.to_string().contains("UCI"));
    assert!(err.to_string().contains("SAN"));
}

fn play(rules: &ScriptedRules, position: &Position, text: &str) -> Result<Applied, IllegalMove> {
    let parsed = rules.parse(text).unwrap();
    rules.apply(position, &parsed)
}

#[test]
fn apply_appends_to_position() {
    let rules = ScriptedRules::new();
    let start = rules.start_position();
    let applied = play(&rules, &start, "e4").unwrap();
    assert_eq!(applied.position.as_str(), "start e4");
    assert_eq!(applied.notation, "e4");
    assert!(applied.terminal.is_none());
    assert!(!applied.gives_check);
}

#[test]
fn illegal_moves_are_rejected_and_hidden() {
    let rules = ScriptedRules::new().with_illegal("e4");
    let err = play(&rules, &rules.start_position(), "e4").unwrap_err();
    assert_eq!(err.notation, "e4");
    assert!(!rules
        .legal_moves(&rules.start_position())
        .contains(&"e4".to_string()));
}

#[test]
fn mate_wins_for_the_mover() {
    let rules = ScriptedRules::new();
    let white = play(&rules, &rules.start_position(), "Qh5#").unwrap();
    assert_eq!(
        white.terminal,
        Some(Terminal {
            result: GameResult::WhiteWins,
            reason: GameOverReason::Checkmate
        })
    );

    let after_e4 = Position::new("start e4");
    let black = play(&rules, &after_e4, "Qh4#").unwrap();
    assert_eq!(black.terminal.map(|t| t.result), Some(GameResult::BlackWins));
}

#[test]
fn check_suffix_gives_check() {
    let rules = ScriptedRules::new();
    let applied = play(&rules, &rules.start_position(), "Bb5+").unwrap();
    assert!(applied.gives_check);
}

#[test]
fn scripted_terminal_and_ply_cap() {
    let rules = ScriptedRules::new()
        .with_terminal("Kf2", GameResult::Draw, GameOverReason::Stalemate)
        .with_max_plies(2);
    let drawn = play(&rules, &rules.start_position(), "Kf2").unwrap();
    assert_eq!(drawn.terminal.map(|t| t.reason), Some(GameOverReason::Stalemate));

    let capped = play(&rules, &Position::new("start e4"), "e5").unwrap();
    assert_eq!(capped.terminal.map(|t| t.result), Some(GameResult::Draw));
}
