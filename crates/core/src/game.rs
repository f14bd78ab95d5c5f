// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Game session data model
//!
//! A `GameSession` is owned by the engine running it and only grows by
//! appending plies. Once an outcome is recorded the session is frozen.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result code of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
    /// Game stopped before a result was reached
    #[serde(rename = "*")]
    Unfinished,
}

impl GameResult {
    pub fn code(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unfinished => "*",
        }
    }

    /// Result when `color` forfeits
    pub fn forfeit_by(color: Color) -> Self {
        match color {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw | GameResult::Unfinished => None,
        }
    }

    pub fn is_decisive(self) -> bool {
        self.winner().is_some()
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    Checkmate,
    Stalemate,
    FiftyMove,
    InsufficientMaterial,
    Repetition,
    /// Any other draw declared by the rules adapter
    Draw,
    ExceededRetries,
    Interrupted,
}

impl GameOverReason {
    pub fn as_str(self) -> &'static str {
        match self {
            GameOverReason::Checkmate => "checkmate",
            GameOverReason::Stalemate => "stalemate",
            GameOverReason::FiftyMove => "fifty-move rule",
            GameOverReason::InsufficientMaterial => "insufficient material",
            GameOverReason::Repetition => "repetition",
            GameOverReason::Draw => "draw",
            GameOverReason::ExceededRetries => "exceeded retries",
            GameOverReason::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque position handle owned by the rules adapter.
///
/// The core only stores and displays it (e.g. a FEN string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(pub String);

impl Position {
    pub fn new(notation: impl Into<String>) -> Self {
        Self(notation.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display names of the agents bound to each color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    pub white: String,
    pub black: String,
}

impl Seats {
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            white: white.into(),
            black: black.into(),
        }
    }

    pub fn name(&self, color: Color) -> &str {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

/// One applied half-move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ply {
    /// 1-based, gap-free
    pub index: u32,
    pub color: Color,
    pub notation: String,
    pub commentary: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Complete,
}

/// Final outcome of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub result: GameResult,
    pub reason: GameOverReason,
    /// Display name of the winning agent
    pub winner: Option<String>,
}

/// Errors from mutating a session out of order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("game {0} is already complete")]
    Complete(String),
    #[error("ply {got} out of order, expected {expected}")]
    PlyOutOfOrder { expected: u32, got: u32 },
    #[error("ply {index} played by {got}, expected {expected}")]
    WrongColor {
        index: u32,
        expected: Color,
        got: Color,
    },
}

/// One game, from starting position to outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: String,
    pub seats: Seats,
    pub start: Position,
    pub position: Position,
    pub plies: Vec<Ply>,
    pub status: GameStatus,
    pub outcome: Option<Outcome>,
}

impl GameSession {
    pub fn new(id: impl Into<String>, seats: Seats, start: Position) -> Self {
        Self {
            id: id.into(),
            seats,
            position: start.clone(),
            start,
            plies: Vec::new(),
            status: GameStatus::InProgress,
            outcome: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == GameStatus::Complete
    }

    /// Color whose turn it is
    pub fn to_move(&self) -> Color {
        if self.plies.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn next_ply_index(&self) -> u32 {
        self.plies.len() as u32 + 1
    }

    /// Full-move number of the next ply (1 for the opening pair)
    pub fn move_number(&self) -> u32 {
        self.plies.len() as u32 / 2 + 1
    }

    /// Move notations in play order
    pub fn history(&self) -> Vec<String> {
        self.plies.iter().map(|p| p.notation.clone()).collect()
    }

    /// Append a ply, enforcing gap-free indices and alternating colors
    pub fn push_ply(&mut self, ply: Ply) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Complete(self.id.clone()));
        }
        let expected = self.next_ply_index();
        if ply.index != expected {
            return Err(SessionError::PlyOutOfOrder {
                expected,
                got: ply.index,
            });
        }
        if ply.color != self.to_move() {
            return Err(SessionError::WrongColor {
                index: ply.index,
                expected: self.to_move(),
                got: ply.color,
            });
        }
        self.position = ply.position.clone();
        self.plies.push(ply);
        Ok(())
    }

    /// Record the outcome and freeze the session
    pub fn finish(&mut self, outcome: Outcome) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Complete(self.id.clone()));
        }
        self.outcome = Some(outcome);
        self.status = GameStatus::Complete;
        Ok(())
    }

    /// Build the outcome for `result`, naming the winning agent
    pub fn outcome_for(&self, result: GameResult, reason: GameOverReason) -> Outcome {
        Outcome {
            result,
            reason,
            winner: result.winner().map(|c| self.seats.name(c).to_string()),
        }
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod tests;
