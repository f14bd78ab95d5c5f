// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Destinations for a game's event stream

use joust_core::{GameEvent, TournamentEvent};
use joust_storage::{EventLog, LogError};

/// Receives a game's events in order. An error ends the game.
pub trait GameSink: Send {
    fn emit(&mut self, event: GameEvent) -> Result<(), LogError>;

    /// Emit the game's last event
    fn emit_terminal(&mut self, event: GameEvent) -> Result<(), LogError> {
        self.emit(event)
    }
}

/// A game log records its `GameOver` even when full
impl GameSink for EventLog<GameEvent> {
    fn emit(&mut self, event: GameEvent) -> Result<(), LogError> {
        self.append(event).map(|_| ())
    }

    fn emit_terminal(&mut self, event: GameEvent) -> Result<(), LogError> {
        self.append_terminal(event).map(|_| ())
    }
}

/// Collects events in memory
impl GameSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) -> Result<(), LogError> {
        self.push(event);
        Ok(())
    }
}

/// Wraps a match's game events into the tournament log.
///
/// A match's `GameOver` is not the end of the tournament log, so it takes
/// no reserved slot.
pub struct MatchSink {
    log: EventLog<TournamentEvent>,
    match_id: String,
}

impl MatchSink {
    pub fn new(log: EventLog<TournamentEvent>, match_id: impl Into<String>) -> Self {
        Self {
            log,
            match_id: match_id.into(),
        }
    }
}

impl GameSink for MatchSink {
    fn emit(&mut self, event: GameEvent) -> Result<(), LogError> {
        self.log
            .append(TournamentEvent::MatchGame {
                match_id: self.match_id.clone(),
                event,
            })
            .map(|_| ())
    }
}
