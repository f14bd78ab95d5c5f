// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-lines capture of received envelopes, and restore into a log

use crate::broadcaster::{BroadcastError, Broadcaster, SessionEvent, SessionKind};
use crate::log::{Envelope, EventLog, LogError, LogStatus};
use joust_core::{GameEvent, TournamentEvent};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("capture is empty")]
    Empty,
    #[error("line {line}: event kind differs from the first event")]
    MixedKinds { line: usize },
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
    #[error(transparent)]
    Log(#[from] LogError),
}

/// Appends one envelope per line, flushed on every write
pub struct CaptureWriter {
    file: File,
    count: u64,
}

impl CaptureWriter {
    /// Create or truncate the capture file
    pub fn create(path: &Path) -> Result<Self, CaptureError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file, count: 0 })
    }

    pub fn append(&mut self, envelope: &Envelope<SessionEvent>) -> Result<(), CaptureError> {
        let line = serde_json::to_string(envelope)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Read every envelope from a capture file
pub fn read_capture(path: &Path) -> Result<Vec<Envelope<SessionEvent>>, CaptureError> {
    Ok(read_records(path)?.into_iter().map(|(_, e)| e).collect())
}

/// Envelopes paired with their 1-based line in the file
fn read_records(path: &Path) -> Result<Vec<(usize, Envelope<SessionEvent>)>, CaptureError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let envelope = serde_json::from_str(&line).map_err(|source| CaptureError::Decode {
            line: i + 1,
            source,
        })?;
        records.push((i + 1, envelope));
    }
    Ok(records)
}

/// Status given to a restored session whose capture stops mid-session
pub const UNFINISHED_CAPTURE: &str = "capture ended before the session finished";

/// Load a capture file into a fresh session log named `id`.
///
/// Envelopes keep their timestamps. Indices are kept too, except for a
/// single-match capture whose indices come from the tournament log; those
/// are renumbered from 0. The log is closed when the capture ends on
/// `GameOver` or `TournamentComplete`, failed with the abort reason on
/// `TournamentAborted`, and failed as unfinished otherwise. A restore
/// that errors part way leaves the session failed.
pub fn restore(
    broadcaster: &Broadcaster,
    id: &str,
    path: &Path,
) -> Result<SessionKind, CaptureError> {
    let records = read_records(path)?;
    let kind = match records.first().map(|(_, e)| &e.event) {
        Some(SessionEvent::Game(_)) => SessionKind::Game,
        Some(SessionEvent::Tournament(_)) => SessionKind::Tournament,
        None => return Err(CaptureError::Empty),
    };

    match kind {
        SessionKind::Game => {
            let log = broadcaster.open_game(id)?;
            fill(&log, records, as_game, game_ending)?;
        }
        SessionKind::Tournament => {
            let log = broadcaster.open_tournament(id)?;
            fill(&log, records, as_tournament, tournament_ending)?;
        }
    }
    Ok(kind)
}

fn as_game(event: SessionEvent) -> Option<GameEvent> {
    match event {
        SessionEvent::Game(event) => Some(event),
        SessionEvent::Tournament(_) => None,
    }
}

fn as_tournament(event: SessionEvent) -> Option<TournamentEvent> {
    match event {
        SessionEvent::Tournament(event) => Some(event),
        SessionEvent::Game(_) => None,
    }
}

fn game_ending(event: &GameEvent) -> Option<LogStatus> {
    event.is_game_over().then_some(LogStatus::Closed)
}

fn tournament_ending(event: &TournamentEvent) -> Option<LogStatus> {
    match event {
        TournamentEvent::TournamentComplete { .. } => Some(LogStatus::Closed),
        TournamentEvent::TournamentAborted { reason, .. } => Some(LogStatus::Failed {
            reason: reason.clone(),
        }),
        _ => None,
    }
}

fn fill<E: Clone + Send + Sync + 'static>(
    log: &EventLog<E>,
    records: Vec<(usize, Envelope<SessionEvent>)>,
    unwrap: fn(SessionEvent) -> Option<E>,
    ending: fn(&E) -> Option<LogStatus>,
) -> Result<(), CaptureError> {
    let renumber = records
        .iter()
        .enumerate()
        .any(|(i, (_, envelope))| envelope.seq != i as u64);

    let mut end = None;
    for (line, envelope) in records {
        let Envelope { seq, at, event } = envelope;
        let Some(event) = unwrap(event) else {
            let e = CaptureError::MixedKinds { line };
            log.fail(e.to_string());
            return Err(e);
        };
        if let Some(status) = ending(&event) {
            end = Some(status);
        }
        let seq = if renumber { log.len() } else { seq };
        if let Err(e) = log.append_envelope(Envelope { seq, at, event }) {
            log.fail(format!("restore stopped at line {}: {}", line, e));
            return Err(e.into());
        }
    }

    match end {
        Some(LogStatus::Failed { reason }) => log.fail(reason),
        Some(_) => log.close(),
        None => log.fail(UNFINISHED_CAPTURE),
    }
    Ok(())
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
