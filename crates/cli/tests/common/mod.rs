// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use joust_core::{
    Bracket, Color, Decision, DrawPolicy, GameEvent, GameOverReason, GameResult, MatchRecord,
    Participant, Position, Seats, StandingEntry, TournamentEvent,
};
use joust_storage::{CaptureWriter, EventLog, SessionEvent};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Scratch directory that is removed on drop
pub fn setup_test_env() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// A short game: white plays e4, black plays e5, then black forfeits
pub fn game_events() -> Vec<GameEvent> {
    vec![
        GameEvent::GameStart {
            game_id: "game-1".to_string(),
            seats: Seats::new("alpha", "beta"),
            start: Position::new("start"),
        },
        GameEvent::MoveApplied {
            index: 1,
            color: Color::White,
            notation: "e4".to_string(),
            commentary: "central".to_string(),
            position: Position::new("start e4"),
        },
        GameEvent::MoveApplied {
            index: 2,
            color: Color::Black,
            notation: "e5".to_string(),
            commentary: String::new(),
            position: Position::new("start e4 e5"),
        },
        GameEvent::GameOver {
            result: GameResult::WhiteWins,
            reason: GameOverReason::ExceededRetries,
            winner: Some("alpha".to_string()),
            total_plies: 2,
            export: "1. e4 e5 1-0".to_string(),
        },
    ]
}

/// A two-player tournament decided by the seed rule
pub fn tournament_events() -> Vec<TournamentEvent> {
    let alpha = Participant::new(1, "alpha");
    let beta = Participant::new(2, "beta");
    let record = MatchRecord {
        match_id: "R1-M1".to_string(),
        round: 1,
        a: alpha.clone(),
        b: Some(beta.clone()),
        games: Vec::new(),
        winner: alpha.clone(),
        decision: Decision::Adjudicated {
            policy: DrawPolicy::Seed,
        },
    };
    let mut standings = vec![
        StandingEntry::new(alpha.clone()),
        StandingEntry::new(beta.clone()),
    ];
    standings[0].adjudicated_wins = 1;
    standings[1].eliminated_in = Some(1);

    vec![
        TournamentEvent::TournamentStart {
            tournament_id: "tournament-1".to_string(),
            participants: vec![alpha.clone(), beta.clone()],
            bracket: Bracket::default(),
            draw_policy: DrawPolicy::Seed,
        },
        TournamentEvent::MatchStart {
            match_id: "R1-M1".to_string(),
            round: 1,
            game_number: 1,
            white: alpha.clone(),
            black: beta,
        },
        TournamentEvent::MatchComplete {
            match_id: "R1-M1".to_string(),
            round: 1,
            record: record.clone(),
        },
        TournamentEvent::TournamentComplete {
            winner: alpha,
            results: vec![record],
            standings,
        },
    ]
}

/// Write events to `dir/name.jsonl` in capture format
pub fn write_capture(dir: &Path, name: &str, events: Vec<SessionEvent>) -> PathBuf {
    let path = dir.join(format!("{}.jsonl", name));
    let log = EventLog::new(name);
    for event in events {
        log.append(event).expect("append");
    }
    log.close();

    let mut writer = CaptureWriter::create(&path).expect("create capture");
    for envelope in log.read_from(0) {
        writer.append(&envelope).expect("write capture");
    }
    path
}

pub fn game_capture(dir: &Path, name: &str) -> PathBuf {
    let events = game_events().into_iter().map(SessionEvent::Game).collect();
    write_capture(dir, name, events)
}

pub fn tournament_capture(dir: &Path, name: &str) -> PathBuf {
    let events = tournament_events()
        .into_iter()
        .map(SessionEvent::Tournament)
        .collect();
    write_capture(dir, name, events)
}

/// A `joust serve` child process, killed on drop
pub struct ServerProcess {
    child: Child,
    pub socket: PathBuf,
}

impl ServerProcess {
    pub fn start(dir: &Path, captures: &[PathBuf]) -> Self {
        let socket = dir.join("joust.sock");
        let child = Command::new(assert_cmd::cargo::cargo_bin("joust"))
            .current_dir(dir)
            .arg("serve")
            .arg("--socket")
            .arg(&socket)
            .args(captures)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn joust serve");

        let server = Self { child, socket };
        server.wait_ready(Duration::from_secs(10));
        server
    }

    fn wait_ready(&self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while !self.socket.exists() {
            assert!(
                Instant::now() < deadline,
                "server did not bind {}",
                self.socket.display()
            );
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
