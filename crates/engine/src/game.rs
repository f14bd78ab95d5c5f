// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Game engine: drives one game from the starting position to an outcome
//!
//! Each turn moves through an explicit state machine:
//!
//! ```text
//! AwaitingMove -> Requesting -> Validating -> Applying -> AwaitingMove
//!                     ^              |
//!                     +- Correcting -+-> Forfeited
//! ```
//!
//! The agent call is the only suspension point. A stop request is honored
//! before a turn begins and while the agent call is outstanding.

use crate::error::EngineError;
use crate::sink::GameSink;
use crate::stop::StopSignal;
use joust_adapters::{
    Agent, AgentError, Applied, CommentarySink, Correction, MoveRequest, Proposal, RulesAdapter,
    Terminal,
};
use joust_core::{
    Color, GameConfig, GameEvent, GameOverReason, GameResult, GameSession, Ply, Rejection,
    RejectionStage, Seats,
};
use joust_storage::EventLog;
use std::sync::Arc;
use tracing::Instrument;

/// An agent bound to a color
#[derive(Clone)]
pub struct Seat {
    pub name: String,
    pub agent: Arc<dyn Agent>,
}

impl Seat {
    pub fn new(name: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        Self {
            name: name.into(),
            agent,
        }
    }
}

pub struct GameSetup {
    pub game_id: String,
    pub white: Seat,
    pub black: Seat,
}

impl GameSetup {
    fn seat(&self, color: Color) -> &Seat {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

enum TurnState {
    AwaitingMove,
    Requesting {
        attempt: u32,
        correction: Option<Correction>,
    },
    Validating {
        attempt: u32,
        proposal: Proposal,
    },
    Correcting {
        attempt: u32,
        rejected: String,
        rejection: Rejection,
    },
    Applying {
        applied: Applied,
        commentary: String,
    },
    Forfeited,
    Interrupted,
    Over(Terminal),
}

enum Requested {
    Answer(Proposal),
    Failed(AgentError),
    Stopped,
}

/// Runs games against a rules adapter. Cheap to clone.
#[derive(Clone)]
pub struct GameEngine {
    rules: Arc<dyn RulesAdapter>,
    config: GameConfig,
}

impl GameEngine {
    pub fn new(rules: Arc<dyn RulesAdapter>, config: GameConfig) -> Self {
        Self { rules, config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Move-history export for a finished (or stopped) session
    pub fn export(&self, session: &GameSession) -> String {
        let result = session
            .outcome
            .as_ref()
            .map_or(GameResult::Unfinished, |o| o.result);
        self.rules.export(&session.start, &session.plies, result)
    }

    /// Play a game into its own session log, closing the log when done
    pub async fn run_logged(
        &self,
        setup: GameSetup,
        mut log: EventLog<GameEvent>,
        stop: StopSignal,
    ) -> Result<GameSession, EngineError> {
        let result = self.run(setup, &mut log, stop).await;
        match &result {
            Ok(_) => log.close(),
            Err(e) => log.fail(e.to_string()),
        }
        result
    }

    /// Play a game to completion, emitting every transition to `sink`
    pub async fn run<S: GameSink>(
        &self,
        setup: GameSetup,
        sink: &mut S,
        stop: StopSignal,
    ) -> Result<GameSession, EngineError> {
        let span = tracing::info_span!("game", game_id = %setup.game_id);
        self.drive(setup, sink, stop).instrument(span).await
    }

    async fn drive<S: GameSink>(
        &self,
        setup: GameSetup,
        sink: &mut S,
        mut stop: StopSignal,
    ) -> Result<GameSession, EngineError> {
        let seats = Seats::new(&setup.white.name, &setup.black.name);
        let start = self.rules.start_position();
        let mut session = GameSession::new(&setup.game_id, seats.clone(), start.clone());
        sink.emit(GameEvent::GameStart {
            game_id: setup.game_id.clone(),
            seats,
            start,
        })?;
        tracing::info!(white = %setup.white.name, black = %setup.black.name, "game started");

        let mut legal: Vec<String> = Vec::new();
        let mut state = TurnState::AwaitingMove;
        loop {
            let color = session.to_move();
            state = match state {
                TurnState::AwaitingMove => {
                    if stop.is_stopped() {
                        TurnState::Interrupted
                    } else {
                        legal = self.rules.legal_moves(&session.position);
                        sink.emit(GameEvent::TurnStart {
                            color,
                            move_number: session.move_number(),
                            position: session.position.clone(),
                            legal_moves: self.config.show_legal_moves.then(|| legal.clone()),
                            history: session.history(),
                        })?;
                        TurnState::Requesting {
                            attempt: 1,
                            correction: None,
                        }
                    }
                }

                TurnState::Requesting {
                    attempt,
                    correction,
                } => {
                    sink.emit(GameEvent::MoveRequested { color, attempt })?;
                    let request = MoveRequest {
                        game_id: session.id.clone(),
                        color,
                        move_number: session.move_number(),
                        position: session.position.clone(),
                        history: session.history(),
                        legal_moves: self.config.show_legal_moves.then(|| legal.clone()),
                        attempt,
                        correction,
                    };
                    let agent = Arc::clone(&setup.seat(color).agent);
                    match self.request(agent.as_ref(), &request, sink, &mut stop).await? {
                        Requested::Answer(proposal) => TurnState::Validating { attempt, proposal },
                        Requested::Failed(e) => TurnState::Correcting {
                            attempt,
                            rejected: String::new(),
                            rejection: Rejection::new(RejectionStage::Agent, e.to_string()),
                        },
                        Requested::Stopped => TurnState::Interrupted,
                    }
                }

                TurnState::Validating { attempt, proposal } => {
                    match self.validate(&session, &proposal.notation, &legal) {
                        Ok(applied) => TurnState::Applying {
                            applied,
                            commentary: proposal.commentary,
                        },
                        Err(rejection) => TurnState::Correcting {
                            attempt,
                            rejected: proposal.notation,
                            rejection,
                        },
                    }
                }

                TurnState::Correcting {
                    attempt,
                    rejected,
                    rejection,
                } => {
                    tracing::info!(
                        %color,
                        attempt,
                        stage = %rejection.stage,
                        error = %rejection.message,
                        "move rejected"
                    );
                    sink.emit(GameEvent::invalid(color, &rejected, &rejection, attempt))?;
                    if attempt >= self.config.max_retries {
                        TurnState::Forfeited
                    } else {
                        TurnState::Requesting {
                            attempt: attempt + 1,
                            correction: Some(Correction {
                                rejected,
                                stage: rejection.stage,
                                reason: rejection.message,
                            }),
                        }
                    }
                }

                TurnState::Applying {
                    applied,
                    commentary,
                } => {
                    let ply = Ply {
                        index: session.next_ply_index(),
                        color,
                        notation: applied.notation,
                        commentary,
                        position: applied.position,
                    };
                    session.push_ply(ply.clone())?;
                    tracing::debug!(ply = ply.index, %color, notation = %ply.notation, "move applied");
                    sink.emit(GameEvent::applied(&ply))?;
                    match applied.terminal {
                        Some(terminal) => TurnState::Over(terminal),
                        None => {
                            if applied.gives_check {
                                sink.emit(GameEvent::Check {
                                    color_in_check: color.opponent(),
                                    notation: ply.notation,
                                })?;
                            }
                            TurnState::AwaitingMove
                        }
                    }
                }

                TurnState::Forfeited => {
                    return self.finish(
                        session,
                        GameResult::forfeit_by(color),
                        GameOverReason::ExceededRetries,
                        sink,
                    );
                }
                TurnState::Interrupted => {
                    return self.finish(
                        session,
                        GameResult::Unfinished,
                        GameOverReason::Interrupted,
                        sink,
                    );
                }
                TurnState::Over(terminal) => {
                    return self.finish(session, terminal.result, terminal.reason, sink);
                }
            };
        }
    }

    /// Ask the agent for a move, relaying commentary until it answers,
    /// times out or the game is stopped
    async fn request<S: GameSink>(
        &self,
        agent: &dyn Agent,
        request: &MoveRequest,
        sink: &mut S,
        stop: &mut StopSignal,
    ) -> Result<Requested, EngineError> {
        let (commentary, mut chunks) = CommentarySink::channel();
        let call = agent.propose_move(request, commentary);
        tokio::pin!(call);
        let deadline = tokio::time::sleep(self.config.move_timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                _ = stop.stopped() => {
                    tracing::info!(color = %request.color, "stopped while waiting for agent");
                    return Ok(Requested::Stopped);
                }
                Some(chunk) = chunks.recv() => {
                    sink.emit(GameEvent::Commentary { color: request.color, chunk })?;
                }
                result = &mut call => {
                    while let Ok(chunk) = chunks.try_recv() {
                        sink.emit(GameEvent::Commentary { color: request.color, chunk })?;
                    }
                    return Ok(match result {
                        Ok(proposal) => Requested::Answer(proposal),
                        Err(e) => Requested::Failed(e),
                    });
                }
                _ = &mut deadline => {
                    return Ok(Requested::Failed(AgentError::Timeout(self.config.move_timeout)));
                }
            }
        }
    }

    /// Two ordered stages: recognize the notation, then check legality
    fn validate(
        &self,
        session: &GameSession,
        notation: &str,
        legal: &[String],
    ) -> Result<Applied, Rejection> {
        if notation.trim().is_empty() {
            return Err(Rejection::new(RejectionStage::Format, "empty response"));
        }
        let parsed = self
            .rules
            .parse(notation)
            .map_err(|e| Rejection::new(RejectionStage::Format, e.to_string()))?;
        self.rules
            .apply(&session.position, &parsed)
            .map_err(|e| {
                let message = if legal.is_empty() {
                    e.to_string()
                } else {
                    format!("{}. Legal moves: {}", e, legal.join(", "))
                };
                Rejection::new(RejectionStage::Legality, message)
            })
    }

    fn finish<S: GameSink>(
        &self,
        mut session: GameSession,
        result: GameResult,
        reason: GameOverReason,
        sink: &mut S,
    ) -> Result<GameSession, EngineError> {
        let outcome = session.outcome_for(result, reason);
        let export = self.rules.export(&session.start, &session.plies, result);
        let winner = outcome.winner.clone();
        session.finish(outcome)?;
        tracing::info!(
            %result,
            %reason,
            winner = winner.as_deref().unwrap_or("none"),
            plies = session.plies.len(),
            "game over"
        );
        sink.emit_terminal(GameEvent::GameOver {
            result,
            reason,
            winner,
            total_plies: session.plies.len() as u32,
            export,
        })?;
        Ok(session)
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod tests;
