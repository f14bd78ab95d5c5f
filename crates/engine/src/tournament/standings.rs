// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standings derived from completed match records
//!
//! Games played count as wins, losses and draws. A drawn match decided
//! by policy or stopped early additionally counts as an adjudicated win
//! for the advancing side and an adjudicated loss for the other; those
//! earn no points. Byes are counted separately and earn no points.

use joust_core::{Decision, GameResult, MatchRecord, Participant, StandingEntry};
use std::collections::BTreeMap;

pub fn compute_standings(
    participants: &[Participant],
    records: &[MatchRecord],
) -> Vec<StandingEntry> {
    let mut table: BTreeMap<u32, StandingEntry> = participants
        .iter()
        .map(|p| (p.seed, StandingEntry::new(p.clone())))
        .collect();

    for record in records {
        if record.is_bye() {
            if let Some(entry) = table.get_mut(&record.winner.seed) {
                entry.byes += 1;
            }
            continue;
        }

        for game in &record.games {
            match game.winner() {
                Some(winner) => {
                    let loser = if winner.seed == game.white.seed {
                        &game.black
                    } else {
                        &game.white
                    };
                    if let Some(entry) = table.get_mut(&winner.seed) {
                        entry.wins += 1;
                    }
                    if let Some(entry) = table.get_mut(&loser.seed) {
                        entry.losses += 1;
                    }
                }
                None if game.result == GameResult::Draw => {
                    for seed in [game.white.seed, game.black.seed] {
                        if let Some(entry) = table.get_mut(&seed) {
                            entry.draws += 1;
                        }
                    }
                }
                None => {}
            }
        }

        if let Some(loser) = record.loser() {
            if matches!(
                record.decision,
                Decision::Adjudicated { .. } | Decision::Stopped
            ) {
                if let Some(entry) = table.get_mut(&record.winner.seed) {
                    entry.adjudicated_wins += 1;
                }
                if let Some(entry) = table.get_mut(&loser.seed) {
                    entry.adjudicated_losses += 1;
                }
            }
            if let Some(entry) = table.get_mut(&loser.seed) {
                entry.eliminated_in = Some(record.round);
            }
        }
    }

    let mut standings: Vec<StandingEntry> = table
        .into_values()
        .map(|mut entry| {
            entry.points = f64::from(entry.wins) + f64::from(entry.draws) / 2.0;
            entry
        })
        .collect();
    // Half-points keep the ordering exact
    standings.sort_by_key(|e| {
        (
            std::cmp::Reverse(2 * e.wins + e.draws),
            e.participant.seed,
        )
    });
    standings
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod tests;
