// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted agent for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Agent, AgentError, CommentarySink, MoveRequest, Proposal};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Stream `chunks`, then answer with `notation`
    Move {
        notation: String,
        chunks: Vec<String>,
    },
    Error(String),
    /// Report a timeout without waiting
    Timeout,
    /// Never answer
    Hang,
}

impl Reply {
    pub fn mv(notation: impl Into<String>) -> Self {
        Reply::Move {
            notation: notation.into(),
            chunks: Vec::new(),
        }
    }

    pub fn with_chunks(notation: impl Into<String>, chunks: &[&str]) -> Self {
        Reply::Move {
            notation: notation.into(),
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Default)]
struct ScriptState {
    replies: VecDeque<Reply>,
    fallback: Option<Reply>,
    calls: Vec<MoveRequest>,
}

/// Agent that answers from a script, then repeats its fallback.
///
/// Clones share the script and the recorded calls.
#[derive(Clone, Default)]
pub struct ScriptedAgent {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedAgent {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        let agent = Self::default();
        agent
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replies
            .extend(replies);
        agent
    }

    /// Agent that always answers `notation`
    pub fn always(notation: &str) -> Self {
        Self::default().with_fallback(Reply::mv(notation))
    }

    pub fn with_fallback(self, reply: Reply) -> Self {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fallback = Some(reply);
        self
    }

    pub fn push(&self, reply: Reply) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replies
            .push_back(reply);
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<MoveRequest> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    fn next_reply(&self, request: &MoveRequest) -> Reply {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(request.clone());
        match state.replies.pop_front() {
            Some(reply) => reply,
            None => state
                .fallback
                .clone()
                .unwrap_or_else(|| Reply::Error("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn propose_move(
        &self,
        request: &MoveRequest,
        commentary: CommentarySink,
    ) -> Result<Proposal, AgentError> {
        match self.next_reply(request) {
            Reply::Move { notation, chunks } => {
                for chunk in &chunks {
                    commentary.send(chunk.clone());
                }
                Ok(Proposal::new(notation, chunks.concat()))
            }
            Reply::Error(message) => Err(AgentError::Provider(message)),
            Reply::Timeout => Err(AgentError::Timeout(Duration::ZERO)),
            Reply::Hang => std::future::pending::<Result<Proposal, AgentError>>().await,
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
