// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the collaborators a game depends on: agents and rules

pub mod agent;
pub mod rules;
pub mod traced;

pub use agent::{Agent, AgentError, CommentarySink, Correction, MoveRequest, Proposal};
pub use rules::{
    movetext, Applied, FormatError, IllegalMove, Notation, ParsedMove, RulesAdapter, Terminal,
};
pub use traced::TracedAgent;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use agent::{Reply, ScriptedAgent};
#[cfg(any(test, feature = "test-support"))]
pub use rules::ScriptedRules;
