// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use joust_core::{
    Decision, GameEvent, GameReplay, MatchRecord, StandingEntry, TournamentEvent,
    TournamentReplay,
};
use joust_server::Snapshot;
use joust_storage::{Envelope, LogStatus, SessionEvent};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a value as one line of JSON
pub fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        println!("{}", json);
    }
}

pub fn print_envelope(envelope: &Envelope<SessionEvent>, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", event_line(&envelope.event)),
        OutputFormat::Json => print_json(envelope),
    }
}

pub fn status_label(status: &LogStatus) -> String {
    match status {
        LogStatus::Open => "running".to_string(),
        LogStatus::Closed => "complete".to_string(),
        LogStatus::Failed { reason } => format!("failed: {}", reason),
    }
}

fn decision_label(decision: &Decision) -> String {
    match decision {
        Decision::Played => "played".to_string(),
        Decision::Adjudicated { policy } => format!("draw resolved by {}", policy),
        Decision::Bye => "bye".to_string(),
        Decision::Stopped => "stopped, seed rule".to_string(),
    }
}

pub fn event_line(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Game(event) => game_line(event),
        SessionEvent::Tournament(event) => tournament_line(event),
    }
}

pub fn game_line(event: &GameEvent) -> String {
    match event {
        GameEvent::GameStart { game_id, seats, .. } => {
            format!("game {}: {} (white) vs {} (black)", game_id, seats.white, seats.black)
        }
        GameEvent::TurnStart {
            color, move_number, ..
        } => format!("move {}, {} to play", move_number, color),
        GameEvent::MoveRequested { color, attempt } => {
            format!("{} thinking (attempt {})", color, attempt)
        }
        GameEvent::Commentary { color, chunk } => format!("{} > {}", color, chunk),
        GameEvent::InvalidMove {
            color,
            attempted,
            stage,
            error,
            attempt,
        } => format!(
            "{} rejected '{}' on attempt {} ({}): {}",
            color, attempted, attempt, stage, error
        ),
        GameEvent::MoveApplied {
            index,
            color,
            notation,
            commentary,
            ..
        } => {
            if commentary.is_empty() {
                format!("{}. {} plays {}", index, color, notation)
            } else {
                format!("{}. {} plays {}: {}", index, color, notation, commentary)
            }
        }
        GameEvent::Check { color_in_check, .. } => format!("{} is in check", color_in_check),
        GameEvent::GameOver {
            result,
            reason,
            winner,
            ..
        } => match winner {
            Some(winner) => format!("game over: {} ({}), {} wins", result, reason, winner),
            None => format!("game over: {} ({})", result, reason),
        },
    }
}

pub fn tournament_line(event: &TournamentEvent) -> String {
    match event {
        TournamentEvent::TournamentStart {
            tournament_id,
            participants,
            bracket,
            draw_policy,
        } => format!(
            "tournament {}: {} participants, {} rounds, draws by {}",
            tournament_id,
            participants.len(),
            bracket.total_rounds(),
            draw_policy
        ),
        TournamentEvent::RoundStart {
            round,
            total_rounds,
            pairings,
        } => {
            let pairs: Vec<String> = pairings
                .iter()
                .map(|p| match &p.b {
                    Some(b) => format!("{} vs {}", p.a, b),
                    None => format!("{} (bye)", p.a),
                })
                .collect();
            format!("round {}/{}: {}", round, total_rounds, pairs.join(", "))
        }
        TournamentEvent::MatchStart {
            match_id,
            game_number,
            white,
            black,
            ..
        } => format!(
            "[{}] game {}: {} (white) vs {} (black)",
            match_id, game_number, white, black
        ),
        TournamentEvent::MatchGame { match_id, event } => {
            format!("[{}] {}", match_id, game_line(event))
        }
        TournamentEvent::MatchComplete { match_id, record, .. } => format!(
            "[{}] {} advances ({})",
            match_id,
            record.winner,
            decision_label(&record.decision)
        ),
        TournamentEvent::RoundComplete { round, results, .. } => {
            format!("round {} complete, {} matches", round, results.len())
        }
        TournamentEvent::TournamentComplete { winner, .. } => format!("champion: {}", winner),
        TournamentEvent::TournamentAborted { reason, .. } => {
            format!("tournament aborted: {}", reason)
        }
    }
}

/// Multi-line description of a rebuilt session
pub fn summary(snapshot: &Snapshot) -> String {
    match snapshot {
        Snapshot::Empty => "no events".to_string(),
        Snapshot::Game(replay) => game_summary(replay),
        Snapshot::Tournament(replay) => tournament_summary(replay),
    }
}

fn game_summary(replay: &GameReplay) -> String {
    let Some(session) = &replay.session else {
        return "no game".to_string();
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "game {}: {} (white) vs {} (black)",
        session.id, session.seats.white, session.seats.black
    );
    let _ = writeln!(out, "moves: {}", session.history().join(" "));
    match &session.outcome {
        Some(outcome) => {
            let _ = write!(out, "result: {} ({})", outcome.result, outcome.reason);
            if let Some(winner) = &outcome.winner {
                let _ = write!(out, ", {} wins", winner);
            }
        }
        None => {
            let _ = write!(out, "in progress, {} to move", session.to_move());
        }
    }
    out
}

fn tournament_summary(replay: &TournamentReplay) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "tournament {}: {} participants, round {}/{}",
        replay.tournament_id.as_deref().unwrap_or("?"),
        replay.participants.len(),
        replay.current_round,
        replay.total_rounds
    );
    for view in replay.matches.values() {
        if let Some(record) = &view.record {
            let _ = writeln!(out, "{}", match_line(record));
        }
    }
    out.push_str(&standings_table(&replay.standings));
    if let Some(champion) = &replay.champion {
        let _ = write!(out, "champion: {}", champion);
    } else if let Some(reason) = &replay.aborted {
        let _ = write!(out, "aborted: {}", reason);
    } else {
        out.push_str("in progress");
    }
    out
}

fn match_line(record: &MatchRecord) -> String {
    let opponent = record
        .b
        .as_ref()
        .map_or_else(|| "bye".to_string(), |b| b.to_string());
    let results: Vec<&str> = record.games.iter().map(|g| g.result.code()).collect();
    format!(
        "{:<6} {} vs {}: {} advances ({}) [{}]",
        record.match_id,
        record.a,
        opponent,
        record.winner,
        decision_label(&record.decision),
        results.join(" ")
    )
}

pub fn standings_table(standings: &[StandingEntry]) -> String {
    if standings.is_empty() {
        return String::new();
    }
    let mut out = format!(
        "{:<4} {:<20} {:>3} {:>3} {:>3} {:>3} {:>5}\n",
        "SEED", "NAME", "W", "D", "L", "BYE", "PTS"
    );
    for entry in standings {
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:>3} {:>3} {:>3} {:>3} {:>5.1}",
            entry.participant.seed,
            entry.participant.name,
            entry.wins,
            entry.draws,
            entry.losses,
            entry.byes,
            entry.points
        );
    }
    out
}

/// Machine-readable form of a rebuilt session
pub fn summary_json(snapshot: &Snapshot) -> serde_json::Value {
    match snapshot {
        Snapshot::Empty => serde_json::json!({ "kind": "empty" }),
        Snapshot::Game(replay) => serde_json::json!({
            "kind": "game",
            "session": replay.session,
        }),
        Snapshot::Tournament(replay) => {
            let results: Vec<&MatchRecord> = replay
                .matches
                .values()
                .filter_map(|view| view.record.as_ref())
                .collect();
            serde_json::json!({
                "kind": "tournament",
                "tournament_id": replay.tournament_id,
                "champion": replay.champion,
                "aborted": replay.aborted,
                "results": results,
                "standings": replay.standings,
            })
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
