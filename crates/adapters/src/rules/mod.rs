// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Game rules adapters
//!
//! The rules engine owns positions. The core only asks it to recognize a
//! move string, apply it, list legal moves and export a finished game.

mod movetext;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::ScriptedRules;

pub use movetext::movetext;

use joust_core::{GameOverReason, GameResult, Ply, Position};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Accepted move notation families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// Coordinate notation, e.g. `e2e4`, `a7a8q`
    Coordinate,
    /// Standard algebraic notation, e.g. `e4`, `Nf3`, `O-O`
    Algebraic,
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Notation::Coordinate => "UCI",
            Notation::Algebraic => "SAN",
        })
    }
}

/// A move string recognized in one notation family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMove {
    pub text: String,
    pub notation: Notation,
}

/// Move string not recognized in either notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a recognised move. {hint}")]
pub struct FormatError {
    pub input: String,
    /// Names the accepted notation families with examples
    pub hint: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            hint: "Use UCI (e.g. e2e4, a7a8q) or SAN (e.g. e4, Nf3, cxd4, O-O).".to_string(),
        }
    }
}

/// Recognized move that is not legal in the position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{notation}' is not legal here")]
pub struct IllegalMove {
    pub notation: String,
}

/// Game-ending condition detected after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    pub result: GameResult,
    pub reason: GameOverReason,
}

/// Result of applying a legal move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub position: Position,
    /// Canonical notation for history and export
    pub notation: String,
    /// Side to move is in check (and the game is not over)
    pub gives_check: bool,
    pub terminal: Option<Terminal>,
}

pub trait RulesAdapter: Send + Sync + 'static {
    fn start_position(&self) -> Position;

    fn parse(&self, text: &str) -> Result<ParsedMove, FormatError>;

    fn apply(&self, position: &Position, mv: &ParsedMove) -> Result<Applied, IllegalMove>;

    /// Legal moves in canonical notation
    fn legal_moves(&self, position: &Position) -> Vec<String>;

    /// Full move-history export for a finished game
    fn export(&self, _start: &Position, plies: &[Ply], result: GameResult) -> String {
        movetext(plies, result)
    }
}

impl<R: RulesAdapter + ?Sized> RulesAdapter for Arc<R> {
    fn start_position(&self) -> Position {
        (**self).start_position()
    }

    fn parse(&self, text: &str) -> Result<ParsedMove, FormatError> {
        (**self).parse(text)
    }

    fn apply(&self, position: &Position, mv: &ParsedMove) -> Result<Applied, IllegalMove> {
        (**self).apply(position, mv)
    }

    fn legal_moves(&self, position: &Position) -> Vec<String> {
        (**self).legal_moves(position)
    }

    fn export(&self, start: &Position, plies: &[Ply], result: GameResult) -> String {
        (**self).export(start, plies, result)
    }
}
