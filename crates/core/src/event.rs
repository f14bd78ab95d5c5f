// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Game events
//!
//! The engine emits these in order for every observable transition of a
//! game. Observers rebuild game state only from this stream.

use crate::game::{Color, GameOverReason, GameResult, Ply, Position, Seats};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation stage that rejected a proposed move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionStage {
    /// Not recognized in any accepted notation (or empty)
    Format,
    /// Recognized but not legal in the current position
    Legality,
    /// The agent timed out or its provider failed
    Agent,
}

impl fmt::Display for RejectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RejectionStage::Format => "format",
            RejectionStage::Legality => "legality",
            RejectionStage::Agent => "agent",
        })
    }
}

/// A rejected move attempt with its stage-specific reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub stage: RejectionStage,
    pub message: String,
}

impl Rejection {
    pub fn new(stage: RejectionStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// Everything observable about one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// First event of every game; resets observer state
    GameStart {
        game_id: String,
        seats: Seats,
        start: Position,
    },

    TurnStart {
        color: Color,
        move_number: u32,
        position: Position,
        /// Present only when legal moves are shown to agents
        legal_moves: Option<Vec<String>>,
        history: Vec<String>,
    },

    MoveRequested {
        color: Color,
        attempt: u32,
    },

    /// Streamed commentary from the agent while it thinks
    Commentary {
        color: Color,
        chunk: String,
    },

    InvalidMove {
        color: Color,
        attempted: String,
        stage: RejectionStage,
        error: String,
        attempt: u32,
    },

    MoveApplied {
        index: u32,
        color: Color,
        notation: String,
        commentary: String,
        position: Position,
    },

    Check {
        color_in_check: Color,
        notation: String,
    },

    GameOver {
        result: GameResult,
        reason: GameOverReason,
        winner: Option<String>,
        total_plies: u32,
        /// Full move-history export (PGN-like movetext)
        export: String,
    },
}

impl GameEvent {
    /// Short event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameStart { .. } => "game:start",
            GameEvent::TurnStart { .. } => "game:turn",
            GameEvent::MoveRequested { .. } => "game:requested",
            GameEvent::Commentary { .. } => "game:commentary",
            GameEvent::InvalidMove { .. } => "game:invalid",
            GameEvent::MoveApplied { .. } => "game:applied",
            GameEvent::Check { .. } => "game:check",
            GameEvent::GameOver { .. } => "game:over",
        }
    }

    pub fn applied(ply: &Ply) -> Self {
        GameEvent::MoveApplied {
            index: ply.index,
            color: ply.color,
            notation: ply.notation.clone(),
            commentary: ply.commentary.clone(),
            position: ply.position.clone(),
        }
    }

    pub fn invalid(color: Color, attempted: &str, rejection: &Rejection, attempt: u32) -> Self {
        GameEvent::InvalidMove {
            color,
            attempted: attempted.to_string(),
            stage: rejection.stage,
            error: rejection.message.clone(),
            attempt,
        }
    }

    /// The ply carried by a `MoveApplied` event
    pub fn as_ply(&self) -> Option<Ply> {
        match self {
            GameEvent::MoveApplied {
                index,
                color,
                notation,
                commentary,
                position,
            } => Some(Ply {
                index: *index,
                color: *color,
                notation: notation.clone(),
                commentary: commentary.clone(),
                position: position.clone(),
            }),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameEvent::GameOver { .. })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
