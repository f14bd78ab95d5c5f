// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observer-side reducers
//!
//! Folding a game or tournament event stream from its first event
//! rebuilds the same state the engine held. A start event always resets,
//! so a reconnecting observer can replay from the beginning safely.

use crate::event::{GameEvent, RejectionStage};
use crate::game::{Color, GameSession, Outcome, SessionError};
use crate::tournament::{
    DrawPolicy, MatchRecord, Participant, ResolvedPairing, StandingEntry, TournamentEvent,
};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("event {0} arrived before the game started")]
    NoGame(&'static str),
    #[error("event for unknown match {0}")]
    UnknownMatch(String),
    #[error("event {0} arrived before the tournament started")]
    NoTournament(&'static str),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A rejected attempt seen on the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRejection {
    pub color: Color,
    pub attempted: String,
    pub stage: RejectionStage,
    pub error: String,
    pub attempt: u32,
}

/// State rebuilt from a single game's events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameReplay {
    pub session: Option<GameSession>,
    /// Side currently thinking and its attempt number
    pub thinking: Option<(Color, u32)>,
    /// Commentary streamed for the pending move
    pub pending_commentary: String,
    /// Rejections seen during the current turn
    pub rejections: Vec<SeenRejection>,
    /// Side currently in check
    pub in_check: Option<Color>,
}

impl GameReplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_complete())
    }

    pub fn apply(&mut self, event: &GameEvent) -> Result<(), ReplayError> {
        if let GameEvent::GameStart {
            game_id,
            seats,
            start,
        } = event
        {
            *self = Self {
                session: Some(GameSession::new(game_id, seats.clone(), start.clone())),
                ..Self::default()
            };
            return Ok(());
        }

        let session = self
            .session
            .as_mut()
            .ok_or(ReplayError::NoGame(event.name()))?;

        match event {
            GameEvent::GameStart { .. } => {}
            GameEvent::TurnStart { color, .. } => {
                self.thinking = Some((*color, 0));
                self.pending_commentary.clear();
                self.rejections.clear();
            }
            GameEvent::MoveRequested { color, attempt } => {
                self.thinking = Some((*color, *attempt));
                self.pending_commentary.clear();
            }
            GameEvent::Commentary { chunk, .. } => {
                self.pending_commentary.push_str(chunk);
            }
            GameEvent::InvalidMove {
                color,
                attempted,
                stage,
                error,
                attempt,
            } => {
                self.rejections.push(SeenRejection {
                    color: *color,
                    attempted: attempted.clone(),
                    stage: *stage,
                    error: error.clone(),
                    attempt: *attempt,
                });
            }
            GameEvent::MoveApplied { .. } => {
                if let Some(ply) = event.as_ply() {
                    session.push_ply(ply)?;
                }
                self.thinking = None;
                self.in_check = None;
                self.pending_commentary.clear();
            }
            GameEvent::Check { color_in_check, .. } => {
                self.in_check = Some(*color_in_check);
            }
            GameEvent::GameOver {
                result,
                reason,
                winner,
                ..
            } => {
                session.finish(Outcome {
                    result: *result,
                    reason: *reason,
                    winner: winner.clone(),
                })?;
                self.thinking = None;
            }
        }
        Ok(())
    }

    /// Fold a whole stream into fresh state
    pub fn from_events<'a>(
        events: impl IntoIterator<Item = &'a GameEvent>,
    ) -> Result<Self, ReplayError> {
        let mut replay = Self::new();
        for event in events {
            replay.apply(event)?;
        }
        Ok(replay)
    }
}

/// Per-match state inside a tournament replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchView {
    pub round: u32,
    pub white: Option<Participant>,
    pub black: Option<Participant>,
    /// Game currently being played (or the last one)
    pub live: GameReplay,
    /// Completed games in play order
    pub games: Vec<GameSession>,
    pub record: Option<MatchRecord>,
}

/// State rebuilt from a tournament's events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentReplay {
    pub tournament_id: Option<String>,
    pub participants: Vec<Participant>,
    pub draw_policy: DrawPolicy,
    pub total_rounds: u32,
    pub current_round: u32,
    pub pairings: BTreeMap<u32, Vec<ResolvedPairing>>,
    pub matches: BTreeMap<String, MatchView>,
    pub standings: Vec<StandingEntry>,
    pub champion: Option<Participant>,
    pub aborted: Option<String>,
}

impl TournamentReplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.champion.is_some() || self.aborted.is_some()
    }

    pub fn apply(&mut self, event: &TournamentEvent) -> Result<(), ReplayError> {
        if let TournamentEvent::TournamentStart {
            tournament_id,
            participants,
            bracket,
            draw_policy,
        } = event
        {
            *self = Self {
                tournament_id: Some(tournament_id.clone()),
                participants: participants.clone(),
                draw_policy: *draw_policy,
                total_rounds: bracket.total_rounds(),
                ..Self::default()
            };
            return Ok(());
        }

        if self.tournament_id.is_none() {
            return Err(ReplayError::NoTournament(event.name()));
        }

        match event {
            TournamentEvent::TournamentStart { .. } => {}
            TournamentEvent::RoundStart {
                round,
                total_rounds,
                pairings,
            } => {
                self.current_round = *round;
                self.total_rounds = *total_rounds;
                self.pairings.insert(*round, pairings.clone());
            }
            TournamentEvent::MatchStart {
                match_id,
                round,
                white,
                black,
                ..
            } => {
                let view = self.matches.entry(match_id.clone()).or_default();
                view.round = *round;
                view.white = Some(white.clone());
                view.black = Some(black.clone());
                view.live = GameReplay::new();
            }
            TournamentEvent::MatchGame { match_id, event } => {
                let view = self
                    .matches
                    .get_mut(match_id)
                    .ok_or_else(|| ReplayError::UnknownMatch(match_id.clone()))?;
                view.live.apply(event)?;
                if event.is_game_over() {
                    if let Some(session) = view.live.session.clone() {
                        view.games.push(session);
                    }
                }
            }
            TournamentEvent::MatchComplete {
                match_id,
                round,
                record,
            } => {
                let view = self.matches.entry(match_id.clone()).or_default();
                view.round = *round;
                view.record = Some(record.clone());
            }
            TournamentEvent::RoundComplete { standings, .. } => {
                self.standings = standings.clone();
            }
            TournamentEvent::TournamentComplete {
                winner, standings, ..
            } => {
                self.champion = Some(winner.clone());
                self.standings = standings.clone();
            }
            TournamentEvent::TournamentAborted { reason, standings } => {
                self.aborted = Some(reason.clone());
                self.standings = standings.clone();
            }
        }
        Ok(())
    }

    pub fn from_events<'a>(
        events: impl IntoIterator<Item = &'a TournamentEvent>,
    ) -> Result<Self, ReplayError> {
        let mut replay = Self::new();
        for event in events {
            replay.apply(event)?;
        }
        Ok(replay)
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
