// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::agent::{Agent, AgentError, CommentarySink, MoveRequest, Proposal};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any Agent
#[derive(Clone)]
pub struct TracedAgent<A> {
    name: String,
    inner: A,
}

impl<A> TracedAgent<A> {
    pub fn new(name: impl Into<String>, inner: A) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<A: Agent> Agent for TracedAgent<A> {
    async fn propose_move(
        &self,
        request: &MoveRequest,
        commentary: CommentarySink,
    ) -> Result<Proposal, AgentError> {
        let span = tracing::info_span!(
            "agent.propose",
            agent = %self.name,
            game_id = %request.game_id,
            color = %request.color,
            attempt = request.attempt,
        );

        async {
            tracing::debug!(
                move_number = request.move_number,
                history_len = request.history.len(),
                corrected = request.correction.is_some(),
                "requesting"
            );

            let start = std::time::Instant::now();
            let result = self.inner.propose_move(request, commentary).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(proposal) => tracing::info!(
                    notation = %proposal.notation,
                    commentary_len = proposal.commentary.len(),
                    elapsed_ms,
                    "proposed"
                ),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "proposal failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
