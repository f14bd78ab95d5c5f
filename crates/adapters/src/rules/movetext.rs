// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use joust_core::{Color, GameResult, Ply};

/// Numbered movetext with the result code, e.g. `1. e4 e5 2. Nf3 1-0`
pub fn movetext(plies: &[Ply], result: GameResult) -> String {
    let mut parts = Vec::with_capacity(plies.len() + plies.len() / 2 + 1);
    for ply in plies {
        if ply.color == Color::White {
            parts.push(format!("{}.", ply.index.div_ceil(2)));
        }
        parts.push(ply.notation.clone());
    }
    parts.push(result.code().to_string());
    parts.join(" ")
}
