// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Color assignment and draw adjudication for one match

use joust_core::{ColorAssignment, DrawPolicy, Participant};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of per-match randomness.
///
/// A seeded tournament derives one seed per match up front, so results do
/// not depend on the order concurrent matches finish in.
pub struct Coins {
    rng: StdRng,
}

impl Coins {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Independent coins for one match
    pub fn split(&mut self) -> Coins {
        Coins::new(Some(self.rng.gen()))
    }

    pub fn flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

fn lower_seed<'a>(a: &'a Participant, b: &'a Participant) -> &'a Participant {
    if a.seed <= b.seed {
        a
    } else {
        b
    }
}

fn higher_seed<'a>(a: &'a Participant, b: &'a Participant) -> &'a Participant {
    if a.seed <= b.seed {
        b
    } else {
        a
    }
}

/// (white, black) for the first game of a match
pub fn first_colors(
    assignment: ColorAssignment,
    a: &Participant,
    b: &Participant,
    coins: &mut Coins,
) -> (Participant, Participant) {
    match assignment {
        ColorAssignment::SeedOrder => (lower_seed(a, b).clone(), higher_seed(a, b).clone()),
        ColorAssignment::Random => {
            if coins.flip() {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            }
        }
    }
}

/// Participant advancing from a drawn match under a no-replay policy.
///
/// `Rematch` never reaches here except when the rematch cap is hit, where
/// the seed rule applies.
pub fn adjudicate(
    policy: DrawPolicy,
    a: &Participant,
    b: &Participant,
    coins: &mut Coins,
) -> Participant {
    match policy {
        DrawPolicy::CoinFlip => {
            if coins.flip() {
                a.clone()
            } else {
                b.clone()
            }
        }
        DrawPolicy::Seed | DrawPolicy::Rematch => lower_seed(a, b).clone(),
    }
}

/// Seed-rule winner, used for stopped matches
pub fn by_seed(a: &Participant, b: &Participant) -> Participant {
    lower_seed(a, b).clone()
}
