// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted rules for testing
//!
//! Positions are the starting token followed by every applied move,
//! space separated. Any well-formed move is legal unless listed as
//! illegal. A move ending in `#` mates; one ending in `+` checks.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Applied, FormatError, IllegalMove, Notation, ParsedMove, RulesAdapter, Terminal};
use joust_core::{GameOverReason, GameResult, Position};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct ScriptedRules {
    illegal: HashSet<String>,
    terminals: HashMap<String, Terminal>,
    legal_moves: Vec<String>,
    max_plies: Option<u32>,
}

impl Default for ScriptedRules {
    fn default() -> Self {
        Self {
            illegal: HashSet::new(),
            terminals: HashMap::new(),
            legal_moves: ["e4", "d4", "Nf3", "c4"].map(String::from).to_vec(),
            max_plies: None,
        }
    }
}

impl ScriptedRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `notation` as illegal in every position
    pub fn with_illegal(mut self, notation: &str) -> Self {
        self.illegal.insert(notation.to_string());
        self
    }

    /// End the game when `notation` is played
    pub fn with_terminal(mut self, notation: &str, result: GameResult, reason: GameOverReason) -> Self {
        self.terminals
            .insert(notation.to_string(), Terminal { result, reason });
        self
    }

    pub fn with_legal_moves(mut self, moves: &[&str]) -> Self {
        self.legal_moves = moves.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Declare a draw once this many plies have been played
    pub fn with_max_plies(mut self, max: u32) -> Self {
        self.max_plies = Some(max);
        self
    }

    fn plies_in(position: &Position) -> u32 {
        position.as_str().split_whitespace().count().saturating_sub(1) as u32
    }
}

impl RulesAdapter for ScriptedRules {
    fn start_position(&self) -> Position {
        Position::new("start")
    }

    fn parse(&self, text: &str) -> Result<ParsedMove, FormatError> {
        let text = text.trim();
        let notation = if is_coordinate(text) {
            Notation::Coordinate
        } else if is_algebraic(text) {
            Notation::Algebraic
        } else {
            return Err(FormatError::new(text));
        };
        Ok(ParsedMove {
            text: text.to_string(),
            notation,
        })
    }

    fn apply(&self, position: &Position, mv: &ParsedMove) -> Result<Applied, IllegalMove> {
        if self.illegal.contains(&mv.text) {
            return Err(IllegalMove {
                notation: mv.text.clone(),
            });
        }
        let next = Position::new(format!("{} {}", position.as_str(), mv.text));
        let plies = Self::plies_in(&next);
        let mover_wins = if plies % 2 == 1 {
            GameResult::WhiteWins
        } else {
            GameResult::BlackWins
        };

        let terminal = if mv.text.ends_with('#') {
            Some(Terminal {
                result: mover_wins,
                reason: GameOverReason::Checkmate,
            })
        } else if let Some(terminal) = self.terminals.get(&mv.text) {
            Some(*terminal)
        } else if self.max_plies.is_some_and(|max| plies >= max) {
            Some(Terminal {
                result: GameResult::Draw,
                reason: GameOverReason::FiftyMove,
            })
        } else {
            None
        };

        Ok(Applied {
            position: next,
            notation: mv.text.clone(),
            gives_check: terminal.is_none() && mv.text.ends_with('+'),
            terminal,
        })
    }

    fn legal_moves(&self, _position: &Position) -> Vec<String> {
        self.legal_moves
            .iter()
            .filter(|m| !self.illegal.contains(*m))
            .cloned()
            .collect()
    }
}

fn is_file(c: char) -> bool {
    ('a'..='h').contains(&c)
}

fn is_rank(c: char) -> bool {
    ('1'..='8').contains(&c)
}

fn is_coordinate(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    match chars.len() {
        4 | 5 => {
            is_file(chars[0])
                && is_rank(chars[1])
                && is_file(chars[2])
                && is_rank(chars[3])
                && (chars.len() == 4 || "qrbn".contains(chars[4]))
        }
        _ => false,
    }
}

fn is_algebraic(text: &str) -> bool {
    let body = text.trim_end_matches(['+', '#']);
    if body == "O-O" || body == "O-O-O" {
        return true;
    }
    let body = match body.split_once('=') {
        Some((head, promo)) if promo.len() == 1 && "QRBN".contains(promo) => head,
        Some(_) => return false,
        None => body,
    };
    let body = body
        .strip_prefix(|c: char| "KQRBN".contains(c))
        .unwrap_or(body);
    let chars: Vec<char> = body.chars().collect();
    let n = chars.len();
    if !(2..=5).contains(&n) || !is_file(chars[n - 2]) || !is_rank(chars[n - 1]) {
        return false;
    }
    chars[..n - 2]
        .iter()
        .all(|c| is_file(*c) || is_rank(*c) || *c == 'x')
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
