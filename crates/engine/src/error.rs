// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine
//!
//! Rejected moves, agent failures, forfeits and interruptions are game
//! outcomes, not errors. Only losing the event log is.

use joust_core::SessionError;
use joust_storage::{BroadcastError, LogError};
use thiserror::Error;

/// Errors that end a game without an outcome
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("emit failed: {0}")]
    Emit(#[from] LogError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Errors that halt a tournament
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("a tournament needs at least 2 participants, got {0}")]
    TooFewParticipants(usize),
    #[error("log error: {0}")]
    Log(#[from] LogError),
    #[error("broadcast error: {0}")]
    Broadcast(#[from] BroadcastError),
    #[error("tournament aborted: {0}")]
    Aborted(String),
}
