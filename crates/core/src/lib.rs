// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! joust-core: data model for agent games and knockout tournaments
//!
//! This crate provides:
//! - Game sessions, plies and outcomes
//! - The closed game and tournament event unions
//! - Replay reducers that rebuild state from an event stream
//! - Configuration, clocks, id generation and reconnect backoff

pub mod backoff;
pub mod clock;
pub mod config;
pub mod event;
pub mod game;
pub mod id;
pub mod replay;
pub mod tournament;

pub use backoff::Backoff;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, GameConfig, LogConfig, ObserverConfig, TournamentConfig};
pub use event::{GameEvent, Rejection, RejectionStage};
pub use game::{
    Color, GameOverReason, GameResult, GameSession, GameStatus, Outcome, Ply, Position, Seats,
    SessionError,
};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use replay::{GameReplay, MatchView, ReplayError, TournamentReplay};
pub use tournament::{
    Bracket, ColorAssignment, Decision, DrawPolicy, GameSummary, MatchRecord, Pairing,
    Participant, ResolvedPairing, Round, Slot, StandingEntry, TournamentEvent,
};
