// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn uuid_gen_creates_unique_prefixed_ids() {
    let id_gen = UuidIdGen;
    let id1 = id_gen.next("game");
    let id2 = id_gen.next("game");
    assert_ne!(id1, id2);
    assert!(id1.starts_with("game-"));
    assert_eq!(id1.len(), "game-".len() + 32);
}

#[test]
fn sequential_gen_counts_per_prefix() {
    let id_gen = SequentialIdGen::new();
    assert_eq!(id_gen.next("game"), "game-1");
    assert_eq!(id_gen.next("game"), "game-2");
    assert_eq!(id_gen.next("tournament"), "tournament-1");
    assert_eq!(id_gen.next("game"), "game-3");
}

#[test]
fn sequential_gen_is_cloneable_and_shared() {
    let id_gen1 = SequentialIdGen::new();
    let id_gen2 = id_gen1.clone();
    assert_eq!(id_gen1.next("g"), "g-1");
    assert_eq!(id_gen2.next("g"), "g-2");
    assert_eq!(id_gen1.next("g"), "g-3");
}
