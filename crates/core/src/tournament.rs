// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tournament data model and events
//!
//! A knockout bracket is a list of rounds. Round one pairs seeds (or a
//! seed with a bye); later rounds reference the winners of earlier
//! matches by match id, so the bracket never holds mutable links.

use crate::event::GameEvent;
use crate::game::{GameOverReason, GameResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A seeded entrant. Seed 1 is the strongest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub seed: u32,
    pub name: String,
}

impl Participant {
    pub fn new(seed: u32, name: impl Into<String>) -> Self {
        Self {
            seed,
            name: name.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seed, self.name)
    }
}

/// One side of a pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ref", rename_all = "snake_case")]
pub enum Slot {
    Seed(u32),
    /// Winner of an earlier match
    WinnerOf(String),
    Bye,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub match_id: String,
    pub a: Slot,
    pub b: Slot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based
    pub number: u32,
    pub pairings: Vec<Pairing>,
}

/// Full single-elimination bracket, fixed at tournament start
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bracket {
    pub rounds: Vec<Round>,
}

impl Bracket {
    pub fn total_rounds(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn round(&self, number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.number == number)
    }
}

/// How a drawn match is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Replay with colors swapped until decisive
    #[default]
    Rematch,
    CoinFlip,
    /// Lower seed number advances
    Seed,
}

impl DrawPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            DrawPolicy::Rematch => "rematch",
            DrawPolicy::CoinFlip => "coin_flip",
            DrawPolicy::Seed => "seed",
        }
    }
}

impl fmt::Display for DrawPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rematch" => Ok(DrawPolicy::Rematch),
            "coin_flip" | "coin-flip" | "coinflip" => Ok(DrawPolicy::CoinFlip),
            "seed" => Ok(DrawPolicy::Seed),
            other => Err(format!(
                "unknown draw policy '{}' (expected rematch, coin_flip or seed)",
                other
            )),
        }
    }
}

/// How colors are assigned in the first game of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorAssignment {
    #[default]
    Random,
    /// Lower seed number takes white
    SeedOrder,
}

/// How a match winner was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// Decisive game over the board
    Played,
    /// Drawn match resolved by policy
    Adjudicated { policy: DrawPolicy },
    Bye,
    /// Match stopped before a decisive game; resolved by seed
    Stopped,
}

/// Summary of one game inside a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: String,
    pub white: Participant,
    pub black: Participant,
    pub result: GameResult,
    pub reason: GameOverReason,
    pub plies: u32,
    pub export: String,
}

impl GameSummary {
    /// Participant who won this game, if decisive
    pub fn winner(&self) -> Option<&Participant> {
        match self.result {
            GameResult::WhiteWins => Some(&self.white),
            GameResult::BlackWins => Some(&self.black),
            GameResult::Draw | GameResult::Unfinished => None,
        }
    }
}

/// Outcome of a finished match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub round: u32,
    pub a: Participant,
    /// `None` for a bye
    pub b: Option<Participant>,
    pub games: Vec<GameSummary>,
    pub winner: Participant,
    pub decision: Decision,
}

impl MatchRecord {
    pub fn loser(&self) -> Option<&Participant> {
        let b = self.b.as_ref()?;
        if self.winner.seed == self.a.seed {
            Some(b)
        } else {
            Some(&self.a)
        }
    }

    pub fn is_bye(&self) -> bool {
        self.b.is_none()
    }
}

/// Round pairing with participants resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPairing {
    pub match_id: String,
    pub a: Participant,
    pub b: Option<Participant>,
}

/// Cumulative per-participant tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub participant: Participant,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub byes: u32,
    pub adjudicated_wins: u32,
    pub adjudicated_losses: u32,
    /// wins + draws / 2
    pub points: f64,
    /// Round in which the participant was knocked out
    pub eliminated_in: Option<u32>,
}

impl StandingEntry {
    pub fn new(participant: Participant) -> Self {
        Self {
            participant,
            wins: 0,
            losses: 0,
            draws: 0,
            byes: 0,
            adjudicated_wins: 0,
            adjudicated_losses: 0,
            points: 0.0,
            eliminated_in: None,
        }
    }
}

/// Events emitted on a tournament's session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TournamentEvent {
    /// First event of every tournament; resets observer state
    TournamentStart {
        tournament_id: String,
        participants: Vec<Participant>,
        bracket: Bracket,
        draw_policy: DrawPolicy,
    },

    RoundStart {
        round: u32,
        total_rounds: u32,
        pairings: Vec<ResolvedPairing>,
    },

    /// Start of one game in a match; `game_number` counts rematches
    MatchStart {
        match_id: String,
        round: u32,
        game_number: u32,
        white: Participant,
        black: Participant,
    },

    /// A game event relayed from a match in progress
    MatchGame {
        match_id: String,
        event: GameEvent,
    },

    MatchComplete {
        match_id: String,
        round: u32,
        record: MatchRecord,
    },

    RoundComplete {
        round: u32,
        results: Vec<MatchRecord>,
        standings: Vec<StandingEntry>,
    },

    TournamentComplete {
        winner: Participant,
        results: Vec<MatchRecord>,
        standings: Vec<StandingEntry>,
    },

    TournamentAborted {
        reason: String,
        standings: Vec<StandingEntry>,
    },
}

impl TournamentEvent {
    /// Short event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            TournamentEvent::TournamentStart { .. } => "tournament:start",
            TournamentEvent::RoundStart { .. } => "round:start",
            TournamentEvent::MatchStart { .. } => "match:start",
            TournamentEvent::MatchGame { .. } => "match:game",
            TournamentEvent::MatchComplete { .. } => "match:complete",
            TournamentEvent::RoundComplete { .. } => "round:complete",
            TournamentEvent::TournamentComplete { .. } => "tournament:complete",
            TournamentEvent::TournamentAborted { .. } => "tournament:aborted",
        }
    }

    /// Match this event belongs to, if any
    pub fn match_id(&self) -> Option<&str> {
        match self {
            TournamentEvent::MatchStart { match_id, .. }
            | TournamentEvent::MatchGame { match_id, .. }
            | TournamentEvent::MatchComplete { match_id, .. } => Some(match_id),
            _ => None,
        }
    }

    /// True for the events that end a tournament log
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TournamentEvent::TournamentComplete { .. } | TournamentEvent::TournamentAborted { .. }
        )
    }
}

#[cfg(test)]
#[path = "tournament_tests.rs"]
mod tests;
