// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Move-proposing agents
//!
//! An agent is any service that, given a position and history, returns a
//! move string plus commentary. It may stream commentary while thinking and
//! may fail or never answer; the game engine owns timeouts and retries.

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{Reply, ScriptedAgent};

use async_trait::async_trait;
use joust_core::{Color, Position, RejectionStage};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from agent calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("API error: {0}")]
    Provider(String),
}

/// Feedback for a retry after a rejected attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub rejected: String,
    pub stage: RejectionStage,
    pub reason: String,
}

/// Everything an agent is told about the turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub game_id: String,
    pub color: Color,
    pub move_number: u32,
    pub position: Position,
    pub history: Vec<String>,
    /// Present when legal moves are shown to agents
    pub legal_moves: Option<Vec<String>>,
    /// 1-based attempt within the turn
    pub attempt: u32,
    pub correction: Option<Correction>,
}

/// An agent's answer: the move string and its full commentary
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Proposal {
    pub notation: String,
    pub commentary: String,
}

impl Proposal {
    pub fn new(notation: impl Into<String>, commentary: impl Into<String>) -> Self {
        Self {
            notation: notation.into(),
            commentary: commentary.into(),
        }
    }
}

/// Where an agent streams commentary chunks while thinking.
///
/// Sending never blocks; chunks sent after the turn resolves are dropped.
#[derive(Debug, Clone)]
pub struct CommentarySink {
    tx: Option<mpsc::UnboundedSender<String>>,
}

impl CommentarySink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that drops everything
    pub fn discard() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, chunk: impl Into<String>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(chunk.into());
        }
    }
}

#[async_trait]
pub trait Agent: Send + Sync + 'static {
    async fn propose_move(
        &self,
        request: &MoveRequest,
        commentary: CommentarySink,
    ) -> Result<Proposal, AgentError>;
}

#[async_trait]
impl<A: Agent + ?Sized> Agent for Arc<A> {
    async fn propose_move(
        &self,
        request: &MoveRequest,
        commentary: CommentarySink,
    ) -> Result<Proposal, AgentError> {
        (**self).propose_move(request, commentary).await
    }
}
