// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Joust game and tournament engine

mod error;
mod game;
mod sink;
mod stop;
pub mod tournament;

pub use error::{EngineError, SchedulerError};
pub use game::{GameEngine, GameSetup, Seat};
pub use sink::{GameSink, MatchSink};
pub use stop::{stop_pair, StopHandle, StopSignal};
pub use tournament::{Entrant, TournamentControl, TournamentOutcome, TournamentScheduler};
