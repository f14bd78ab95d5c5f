// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-elimination tournaments

pub mod bracket;
mod draw;
mod scheduler;
mod standings;

pub use bracket::{build_bracket, bye_count, match_label};
pub use scheduler::{Entrant, TournamentControl, TournamentOutcome, TournamentScheduler};
pub use standings::compute_standings;
