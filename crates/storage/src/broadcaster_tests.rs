// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use joust_core::{
    Bracket, Color, DrawPolicy, GameOverReason, GameResult, Participant, Position, Seats,
};

fn game_start(id: &str) -> GameEvent {
    GameEvent::GameStart {
        game_id: id.to_string(),
        seats: Seats::new("alpha", "beta"),
        start: Position::new("start"),
    }
}

fn requested(attempt: u32) -> GameEvent {
    GameEvent::MoveRequested {
        color: Color::White,
        attempt,
    }
}

fn wrap(match_id: &str, event: GameEvent) -> TournamentEvent {
    TournamentEvent::MatchGame {
        match_id: match_id.to_string(),
        event,
    }
}

fn tournament_start() -> TournamentEvent {
    TournamentEvent::TournamentStart {
        tournament_id: "t-1".to_string(),
        participants: vec![],
        bracket: Bracket::default(),
        draw_policy: DrawPolicy::Rematch,
    }
}

#[test]
fn duplicate_sessions_are_rejected() {
    let broadcaster = Broadcaster::new();
    broadcaster.open_game("game-1").unwrap();
    assert_eq!(
        broadcaster.open_tournament("game-1").err(),
        Some(BroadcastError::Duplicate("game-1".to_string()))
    );
}

#[test]
fn unknown_session_is_an_error() {
    let broadcaster = Broadcaster::new();
    assert!(matches!(
        broadcaster.subscribe("nope", 0),
        Err(BroadcastError::UnknownSession(_))
    ));
}

#[test]
fn status_reflects_log_lifecycle() {
    let broadcaster = Broadcaster::new();
    let log = broadcaster.open_game("game-1").unwrap();
    log.append(game_start("game-1")).unwrap();

    let info = broadcaster.status("game-1").unwrap();
    assert_eq!(info.kind, SessionKind::Game);
    assert_eq!(info.status, LogStatus::Open);
    assert_eq!(info.events, 1);

    log.close();
    assert_eq!(broadcaster.status("game-1").unwrap().status, LogStatus::Closed);

    let tlog = broadcaster.open_tournament("t-1").unwrap();
    tlog.fail("log full");
    let listed = broadcaster.sessions();
    assert_eq!(listed.len(), 2);
    assert_eq!(
        listed[1].status,
        LogStatus::Failed {
            reason: "log full".to_string()
        }
    );
}

#[test]
fn capacity_applies_to_opened_logs() {
    let broadcaster = Broadcaster::with_capacity(Some(1));
    let log = broadcaster.open_game("game-1").unwrap();
    log.append(game_start("game-1")).unwrap();
    assert!(log.append(requested(1)).is_err());
}

#[tokio::test]
async fn feed_wraps_events_by_kind() {
    let broadcaster = Broadcaster::new();
    let log = broadcaster.open_game("game-1").unwrap();
    log.append(game_start("game-1")).unwrap();
    log.close();

    let mut feed = broadcaster.subscribe("game-1", 0).unwrap();
    let envelope = feed.next().await.unwrap();
    assert_eq!(envelope.seq, 0);
    assert!(matches!(
        envelope.event,
        SessionEvent::Game(GameEvent::GameStart { .. })
    ));
    assert!(feed.next().await.is_none());
}

#[tokio::test]
async fn match_feed_filters_and_unwraps() {
    let broadcaster = Broadcaster::new();
    let log = broadcaster.open_tournament("t-1").unwrap();
    log.append(tournament_start()).unwrap();
    log.append(wrap("R1-M1", game_start("g-1"))).unwrap();
    log.append(wrap("R1-M2", game_start("g-2"))).unwrap();
    log.append(wrap("R1-M1", requested(1))).unwrap();
    log.append(wrap("R1-M2", requested(1))).unwrap();

    let mut feed = broadcaster.subscribe_match("t-1", "R1-M1").unwrap();
    let first = feed.next().await.unwrap();
    assert_eq!(first.seq, 1);
    assert!(matches!(
        first.event,
        SessionEvent::Game(GameEvent::GameStart { ref game_id, .. }) if game_id == "g-1"
    ));
    let second = feed.next().await.unwrap();
    assert_eq!(second.seq, 3);

    let alpha = Participant::new(1, "alpha");
    log.append(TournamentEvent::MatchComplete {
        match_id: "R1-M1".to_string(),
        round: 1,
        record: joust_core::MatchRecord {
            match_id: "R1-M1".to_string(),
            round: 1,
            a: alpha.clone(),
            b: None,
            games: vec![],
            winner: alpha,
            decision: joust_core::Decision::Bye,
        },
    })
    .unwrap();
    // Later events for other matches do not keep the feed open
    log.append(wrap("R1-M2", GameEvent::GameOver {
        result: GameResult::Draw,
        reason: GameOverReason::Draw,
        winner: None,
        total_plies: 0,
        export: "1/2-1/2".to_string(),
    }))
    .unwrap();
    assert!(feed.next().await.is_none());
}

#[test]
fn match_feed_requires_tournament() {
    let broadcaster = Broadcaster::new();
    broadcaster.open_game("game-1").unwrap();
    assert!(matches!(
        broadcaster.subscribe_match("game-1", "F"),
        Err(BroadcastError::NotTournament(_))
    ));
}

#[test]
fn session_event_serializes_with_kind() {
    let event = SessionEvent::Game(requested(2));
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["kind"], "game");
    assert_eq!(json["event"]["type"], "move_requested");
    let back: SessionEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}
