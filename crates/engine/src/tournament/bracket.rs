// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-elimination bracket construction
//!
//! The field is padded with byes to the next power of two. Round one
//! pairs the top half of the seeds against the reversed bottom half
//! (1 v N, 2 v N-1, ...), so the padding byes fall to the top seeds.
//! Each later round pairs the winners of adjacent matches.

use crate::error::SchedulerError;
use joust_core::{Bracket, Pairing, Participant, Round, Slot};

/// Bracket label for match `n` (1-based) of `round` with `count` matches
pub fn match_label(round: u32, n: usize, count: usize) -> String {
    if round == 1 {
        return format!("R1-M{}", n);
    }
    match count {
        1 => "F".to_string(),
        2 => format!("SF-{}", n),
        4 => format!("QF-{}", n),
        _ => format!("R{}-M{}", round, n),
    }
}

/// Number of round-one byes for `participants` entrants
pub fn bye_count(participants: usize) -> usize {
    participants.next_power_of_two() - participants
}

pub fn build_bracket(participants: &[Participant]) -> Result<Bracket, SchedulerError> {
    if participants.len() < 2 {
        return Err(SchedulerError::TooFewParticipants(participants.len()));
    }

    let size = participants.len().next_power_of_two();
    let mut seeds: Vec<u32> = participants.iter().map(|p| p.seed).collect();
    seeds.sort_unstable();
    let slots: Vec<Slot> = (0..size)
        .map(|i| seeds.get(i).map_or(Slot::Bye, |s| Slot::Seed(*s)))
        .collect();

    let half = size / 2;
    let (top, bottom) = slots.split_at(half);
    let first: Vec<Pairing> = top
        .iter()
        .zip(bottom.iter().rev())
        .enumerate()
        .map(|(i, (a, b))| Pairing {
            match_id: match_label(1, i + 1, half),
            a: a.clone(),
            b: b.clone(),
        })
        .collect();

    let mut rounds = vec![Round {
        number: 1,
        pairings: first,
    }];
    let mut number = 1;
    while let Some(previous) = rounds.last() {
        if previous.pairings.len() < 2 {
            break;
        }
        number += 1;
        let count = previous.pairings.len() / 2;
        let pairings = previous
            .pairings
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| Pairing {
                match_id: match_label(number, i + 1, count),
                a: Slot::WinnerOf(pair[0].match_id.clone()),
                b: Slot::WinnerOf(pair[1].match_id.clone()),
            })
            .collect();
        rounds.push(Round { number, pairings });
    }

    Ok(Bracket { rounds })
}

#[cfg(test)]
#[path = "bracket_tests.rs"]
mod tests;
